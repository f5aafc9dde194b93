//! Hash backends.
//!
//! Every key, signature and message digest in a scheme instance goes
//! through the same [`LamportHash`]. The backend is a type parameter on the
//! key and signature types, so material derived with one hash cannot be
//! checked against another.

use sha2::Digest as _;

pub use sha2::Sha256;

/// Length in bytes of every digest.
pub const DIGEST_LEN: usize = 32;

/// A 256-bit digest.
pub type Digest256 = [u8; DIGEST_LEN];

/// A 256-bit cryptographic hash: any-length input, fixed 32-byte output,
/// deterministic and preimage resistant.
pub trait LamportHash {
    fn hash(bytes: &[u8]) -> Digest256;
}

impl LamportHash for Sha256 {
    fn hash(bytes: &[u8]) -> Digest256 {
        Sha256::digest(bytes).into()
    }
}

/// BLAKE3 in its default 32-byte output mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

impl LamportHash for Blake3 {
    fn hash(bytes: &[u8]) -> Digest256 {
        *blake3::hash(bytes).as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_from_hex(s: &str) -> Digest256 {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    #[test]
    fn sha256_known_answers() {
        assert_eq!(
            Sha256::hash(b"abc"),
            digest_from_hex("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(
            Sha256::hash(b""),
            digest_from_hex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn blake3_known_answer() {
        assert_eq!(
            Blake3::hash(b""),
            digest_from_hex("af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262")
        );
    }

    #[test]
    fn backends_disagree() {
        assert_ne!(Sha256::hash(b"test message"), Blake3::hash(b"test message"));
    }
}
