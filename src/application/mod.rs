/// Application layer - Use cases, scanners and DTOs
///
/// This layer orchestrates the compliance domain and reaches
/// infrastructure only through ports.
pub mod dto;
pub mod factories;
pub mod scanners;
pub mod use_cases;
