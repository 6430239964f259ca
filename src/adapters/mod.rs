/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// providing the actual integration with the source-control host,
/// the CI server, the security platform and the local terminal.
pub mod outbound;
