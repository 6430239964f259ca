/// Ports module defining interfaces for hexagonal architecture
///
/// The scan core is driven from `main`; these outbound (driven) ports are the
/// only way it reaches infrastructure.
pub mod outbound;
