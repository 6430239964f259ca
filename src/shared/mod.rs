/// Shared utilities used across layers
pub mod error;
mod result;

pub use result::Result;
