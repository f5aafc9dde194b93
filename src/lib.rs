//! Lamport one-time signatures.
//!
//! A [`KeyPair`] holds 256 pairs of random 32-byte secrets and the 512
//! hashes of those secrets. Signing a message reveals one secret from each
//! pair, chosen by the corresponding bit of the message digest; verifying
//! hashes the revealed secrets and checks them against the public key. Only
//! a hash function is involved, SHA-256 by default.
//!
//! Each private key must sign **at most one** message. Signing a second
//! message publishes enough secrets for others to forge signatures. The API
//! does not stop you from doing so.
//!
//! ```
//! use sha256_lamport_signatures::{generate_key_pair, sign, verify};
//!
//! let key_pair = generate_key_pair()?;
//! let signature = sign(b"test message", key_pair.private_key());
//! assert!(verify(b"test message", &signature, key_pair.public_key()));
//! assert!(!verify(b"test messagf", &signature, key_pair.public_key()));
//! # Ok::<(), sha256_lamport_signatures::Error>(())
//! ```
//!
//! Messages are not length-limited, and nothing records whether a key has
//! already been used; callers promoting this to production use need to
//! handle both.

pub mod error;
pub mod hash;
pub mod lamport;

pub use error::{Error, Result};
pub use hash::{Blake3, Digest256, LamportHash, Sha256};
pub use lamport::{
    generate_key_pair, sign, verify, verify_digests, KeyPair, PrivateKey, PublicKey, Secret256,
    SecretPair, Signature,
};
