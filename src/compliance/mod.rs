//! Compliance domain layer
//!
//! Pure value types, status-derivation policies and the request signer.
//! Nothing here performs network I/O.
pub mod domain;
pub mod policies;
pub mod services;
