//! Wire types and the error taxonomy shared across `token-svc` crates.

pub mod error;
pub mod protocol;

pub use error::TokenError;
