//! Errors surfaced by key generation and by the fallible constructors of
//! [`PublicKey`](crate::lamport::PublicKey) and
//! [`Signature`](crate::lamport::Signature).
//!
//! A signature that fails to verify is not an error: [`verify`](crate::verify)
//! returns `false` for it.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The random source could not supply key material. Nothing is retried.
    #[error("entropy source failed: {0}")]
    Entropy(#[from] rand::Error),

    /// A public key did not hold exactly the expected number of digests.
    #[error("malformed public key: expected {expected} digests, found {found}")]
    MalformedKey { expected: usize, found: usize },

    /// A signature did not hold exactly the expected number of revealed values.
    #[error("malformed signature: expected {expected} revealed values, found {found}")]
    MalformedSignature { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
