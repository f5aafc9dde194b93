use std::array;
use std::fmt;
use std::marker::PhantomData;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{self, Error};
use crate::hash::{Digest256, LamportHash, Sha256};

/// Number of message digest bits signed, and of secret pairs in a
/// [`PrivateKey`].
pub const MESSAGE_BITS: usize = 256;

/// Number of digests in a [`PublicKey`]: one per branch of every pair.
pub const PUBLIC_KEY_SLOTS: usize = 2 * MESSAGE_BITS;

/// Length in bytes of a single secret branch.
pub const SECRET_LEN: usize = 32;

/// An opaque 256-bit secret. Wiped from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret256([u8; SECRET_LEN]);

impl Secret256 {
    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    fn from_slice(bytes: &[u8]) -> Self {
        let mut secret = [0u8; SECRET_LEN];
        secret.copy_from_slice(bytes);
        Secret256(secret)
    }
}

impl From<[u8; SECRET_LEN]> for Secret256 {
    fn from(bytes: [u8; SECRET_LEN]) -> Self {
        Secret256(bytes)
    }
}

impl ConstantTimeEq for Secret256 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Secret256 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Secret256 {}

impl fmt::Debug for Secret256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret256(..)")
    }
}

/// The two preimages for one bit position: `zero_branch` is revealed when
/// the digest bit is 0, `one_branch` when it is 1.
#[derive(Debug)]
pub struct SecretPair {
    zero_branch: Secret256,
    one_branch: Secret256,
}

impl SecretPair {
    pub fn zero_branch(&self) -> &Secret256 {
        &self.zero_branch
    }

    pub fn one_branch(&self) -> &Secret256 {
        &self.one_branch
    }

    /// The branch selected by a digest bit.
    pub fn branch(&self, bit: bool) -> &Secret256 {
        if bit {
            &self.one_branch
        } else {
            &self.zero_branch
        }
    }
}

/// Bit `index` of a message digest.
///
/// Bits are enumerated byte-major and least significant bit first: byte 0
/// before byte 1 and so on up to byte 31, and within each byte bit 0 (the
/// LSB) before bit 1 up to bit 7 (the MSB). Index `i` is therefore bit
/// `i % 8` of byte `i / 8`. Signing and verification both go through this
/// function; signatures produced under any other order will not verify.
fn digest_bit(digest: &Digest256, index: usize) -> bool {
    bit_of_byte(index % 8, digest[index / 8])
}

fn bit_of_byte(index: usize, byte: u8) -> bool {
    let mask = 1u8 << index;
    byte & mask == mask
}

/// A private key is what you generate and keep in order to sign exactly one
/// message. From it, you can derive a [`PublicKey`] and send that to
/// others, allowing them to verify your signature down the line.
///
/// Signing a second message with the same key reveals the other branch at
/// every bit position where the two digests differ, which lets anyone forge
/// signatures on further messages. Nothing here stops you from doing that:
/// sign once, then drop the key.
///
/// The key is not `Clone`, and its secrets are wiped when it is dropped.
pub struct PrivateKey<H = Sha256> {
    pairs: [SecretPair; MESSAGE_BITS],
    _hash: PhantomData<fn() -> H>,
}

impl<H: LamportHash> PrivateKey<H> {
    /// Generates a new private key using the operating system random
    /// number generator.
    pub fn generate() -> error::Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generates a new private key from the given cryptographically secure
    /// random source. Every branch is drawn independently. If the source
    /// fails, no key is returned.
    pub fn generate_with_rng<R>(rng: &mut R) -> error::Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut seed = Zeroizing::new([0u8; PUBLIC_KEY_SLOTS * SECRET_LEN]);
        rng.try_fill_bytes(&mut seed[..])?;
        let pairs = array::from_fn(|i| {
            let offset = 2 * i * SECRET_LEN;
            SecretPair {
                zero_branch: Secret256::from_slice(&seed[offset..offset + SECRET_LEN]),
                one_branch: Secret256::from_slice(
                    &seed[offset + SECRET_LEN..offset + 2 * SECRET_LEN],
                ),
            }
        });
        debug!(pairs = MESSAGE_BITS, "generated lamport private key");
        Ok(PrivateKey {
            pairs,
            _hash: PhantomData,
        })
    }

    /// Creates the [`PublicKey`] associated with this [`PrivateKey`]:
    /// slot `2i` holds the hash of pair `i`'s zero branch and slot `2i + 1`
    /// the hash of its one branch.
    pub fn public_key(&self) -> PublicKey<H> {
        let slots = array::from_fn(|slot| {
            let pair = &self.pairs[slot / 2];
            H::hash(pair.branch(slot % 2 == 1).as_bytes())
        });
        PublicKey::from_slots(slots)
    }

    /// Signs the message, producing a [`Signature`] which another party would
    /// be able to [`PublicKey::verify`] with access to the [`PublicKey`]
    /// derived from this [`PrivateKey`] with [`PrivateKey::public_key`].
    ///
    /// Deterministic: the same message and key always give the same
    /// signature. Call this at most once per key.
    pub fn sign<A: AsRef<[u8]>>(&self, message: A) -> Signature<H> {
        let digest = H::hash(message.as_ref());
        let revealed =
            array::from_fn(|i| self.pairs[i].branch(digest_bit(&digest, i)).clone());
        Signature {
            revealed,
            _hash: PhantomData,
        }
    }

    pub fn pairs(&self) -> &[SecretPair; MESSAGE_BITS] {
        &self.pairs
    }
}

impl<H> ZeroizeOnDrop for PrivateKey<H> {}

impl<H> fmt::Debug for PrivateKey<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

/// The public key associated with a given [`PrivateKey`], allowing any
/// owner to [`PublicKey::verify`] a [`Signature`] produced by that
/// [`PrivateKey`].
pub struct PublicKey<H = Sha256> {
    slots: [Digest256; PUBLIC_KEY_SLOTS],
    _hash: PhantomData<fn() -> H>,
}

impl<H: LamportHash> PublicKey<H> {
    fn from_slots(slots: [Digest256; PUBLIC_KEY_SLOTS]) -> Self {
        PublicKey {
            slots,
            _hash: PhantomData,
        }
    }

    /// All slots in order: zero branch then one branch for bit 0, then
    /// bit 1, and so on.
    pub fn digests(&self) -> &[Digest256; PUBLIC_KEY_SLOTS] {
        &self.slots
    }

    /// The slot checked for digest bit `index` when that bit equals `bit`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MESSAGE_BITS`.
    pub fn slot(&self, index: usize, bit: bool) -> &Digest256 {
        &self.slots[2 * index + usize::from(bit)]
    }

    /// Checks `signature` over `message`. Returns `true` iff every revealed
    /// value hashes to the slot its digest bit selects.
    ///
    /// All 256 revealed values are hashed and compared regardless of where
    /// the first mismatch is, so the work done does not depend on it.
    pub fn verify<A: AsRef<[u8]>>(&self, message: A, signature: &Signature<H>) -> bool {
        let digest = H::hash(message.as_ref());
        let mut matched = Choice::from(1u8);
        for (i, revealed) in signature.revealed.iter().enumerate() {
            let expected = self.slot(i, digest_bit(&digest, i));
            let actual = H::hash(revealed.as_bytes());
            matched &= slot_matches(expected, &actual);
        }
        let valid = bool::from(matched);
        if !valid {
            trace!("lamport signature rejected");
        }
        valid
    }
}

/// Byte-wise constant-time comparison of one expected slot against one
/// recomputed digest.
fn slot_matches(expected: &Digest256, actual: &Digest256) -> Choice {
    expected[..].ct_eq(&actual[..])
}

impl<H> TryFrom<&[Digest256]> for PublicKey<H>
where
    H: LamportHash,
{
    type Error = Error;

    /// Builds a public key from exactly [`PUBLIC_KEY_SLOTS`] digests, in
    /// slot order.
    fn try_from(digests: &[Digest256]) -> error::Result<Self> {
        let slots: [Digest256; PUBLIC_KEY_SLOTS] =
            digests.try_into().map_err(|_| Error::MalformedKey {
                expected: PUBLIC_KEY_SLOTS,
                found: digests.len(),
            })?;
        Ok(PublicKey::from_slots(slots))
    }
}

impl<H> Clone for PublicKey<H> {
    fn clone(&self) -> Self {
        PublicKey {
            slots: self.slots,
            _hash: PhantomData,
        }
    }
}

impl<H> PartialEq for PublicKey<H> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<H> Eq for PublicKey<H> {}

impl<H> fmt::Debug for PublicKey<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}

/// The result of [`PrivateKey::sign`]ing a message. Can be verified
/// to be from the [`PrivateKey`] associated with a [`PublicKey`]
/// if you have that public key, the message, along with the signature.
pub struct Signature<H = Sha256> {
    revealed: [Secret256; MESSAGE_BITS],
    _hash: PhantomData<fn() -> H>,
}

impl<H> Signature<H> {
    /// The revealed branch for every digest bit, in bit order.
    pub fn revealed(&self) -> &[Secret256; MESSAGE_BITS] {
        &self.revealed
    }
}

impl<H> TryFrom<&[[u8; SECRET_LEN]]> for Signature<H> {
    type Error = Error;

    /// Builds a signature from exactly [`MESSAGE_BITS`] revealed values, in
    /// bit order.
    fn try_from(values: &[[u8; SECRET_LEN]]) -> error::Result<Self> {
        if values.len() != MESSAGE_BITS {
            return Err(Error::MalformedSignature {
                expected: MESSAGE_BITS,
                found: values.len(),
            });
        }
        Ok(Signature {
            revealed: array::from_fn(|i| Secret256::from(values[i])),
            _hash: PhantomData,
        })
    }
}

impl<H> Clone for Signature<H> {
    fn clone(&self) -> Self {
        Signature {
            revealed: self.revealed.clone(),
            _hash: PhantomData,
        }
    }
}

impl<H> PartialEq for Signature<H> {
    fn eq(&self, other: &Self) -> bool {
        self.revealed
            .iter()
            .zip(other.revealed.iter())
            .fold(Choice::from(1u8), |acc, (a, b)| acc & a.ct_eq(b))
            .into()
    }
}

impl<H> Eq for Signature<H> {}

impl<H> fmt::Debug for Signature<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("revealed", &self.revealed.len())
            .finish_non_exhaustive()
    }
}

/// A [`PrivateKey`] together with the [`PublicKey`] derived from it in the
/// same generation call.
pub struct KeyPair<H = Sha256> {
    private_key: PrivateKey<H>,
    public_key: PublicKey<H>,
}

impl<H> fmt::Debug for KeyPair<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl<H: LamportHash> KeyPair<H> {
    /// Generates a key pair from the operating system random number
    /// generator.
    pub fn generate() -> error::Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    pub fn generate_with_rng<R>(rng: &mut R) -> error::Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let private_key = PrivateKey::generate_with_rng(rng)?;
        let public_key = private_key.public_key();
        Ok(KeyPair {
            private_key,
            public_key,
        })
    }

    pub fn private_key(&self) -> &PrivateKey<H> {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey<H> {
        &self.public_key
    }

    pub fn into_parts(self) -> (PrivateKey<H>, PublicKey<H>) {
        (self.private_key, self.public_key)
    }

    /// Signs with the private half. The same one-time rule applies as for
    /// [`PrivateKey::sign`].
    pub fn sign<A: AsRef<[u8]>>(&self, message: A) -> Signature<H> {
        self.private_key.sign(message)
    }
}

/// Generates a SHA-256 key pair from the operating system random number
/// generator.
pub fn generate_key_pair() -> error::Result<KeyPair> {
    KeyPair::generate()
}

/// Signs `message` with `private_key`. See [`PrivateKey::sign`].
pub fn sign<H: LamportHash, A: AsRef<[u8]>>(
    message: A,
    private_key: &PrivateKey<H>,
) -> Signature<H> {
    private_key.sign(message)
}

/// Verifies `signature` over `message` against `public_key`. See
/// [`PublicKey::verify`].
pub fn verify<H: LamportHash, A: AsRef<[u8]>>(
    message: A,
    signature: &Signature<H>,
    public_key: &PublicKey<H>,
) -> bool {
    public_key.verify(message, signature)
}

/// Verifies a signature held as raw revealed values against a public key
/// held as raw digests. Wrong element counts fail with
/// [`Error::MalformedSignature`] or [`Error::MalformedKey`] before any
/// hashing is done; a well-formed signature that does not verify is
/// `Ok(false)`.
pub fn verify_digests<H: LamportHash, A: AsRef<[u8]>>(
    message: A,
    signature: &[[u8; SECRET_LEN]],
    public_key: &[Digest256],
) -> error::Result<bool> {
    let public_key = PublicKey::<H>::try_from(public_key)?;
    let signature = Signature::<H>::try_from(signature)?;
    Ok(public_key.verify(message, &signature))
}
