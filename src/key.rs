//! Key types for the two v4 purposes.
//!
//! Keys decode from raw bytes only; text encodings, key IDs, and key
//! wrapping are out of scope. Secret material is wiped when a key is
//! dropped.

use ed25519_dalek::VerifyingKey;
use ed25519_dalek::hazmat::ExpandedSecretKey;
use rand_core::TryCryptoRng;
use zeroize::Zeroize;

use crate::PasetoError;

/// A 32-byte symmetric key for `v4.local` tokens.
pub struct LocalKey(pub(crate) [u8; 32]);

impl Clone for LocalKey {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl core::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("LocalKey").field(&"..").finish()
    }
}

impl Drop for LocalKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl LocalKey {
    /// Accepts exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasetoError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| PasetoError::InvalidKey)
    }

    /// Generate a fresh key from the caller's entropy source.
    pub fn random<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, PasetoError> {
        let mut bytes = [0; 32];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_| PasetoError::EntropyError)?;
        Ok(Self(bytes))
    }
}

/// An Ed25519 signing key for `v4.public` tokens.
///
/// The wire form is the 64-byte expanded keypair: the 32-byte seed
/// followed by the 32-byte public key.
pub struct SecretKey(pub(crate) [u8; 32], pub(crate) ExpandedSecretKey);

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        let esk = ExpandedSecretKey {
            scalar: self.1.scalar,
            hash_prefix: self.1.hash_prefix,
        };
        Self(self.0, esk)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SecretKey").field(&"..").finish()
    }
}

impl SecretKey {
    /// Accepts the 64-byte seed-and-public-key form, and rejects pairs
    /// whose public half does not belong to the seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, PasetoError> {
        let (seed, public) = bytes
            .split_first_chunk::<32>()
            .ok_or(PasetoError::InvalidKey)?;

        let key = Self::from_seed(seed);
        let declared = PublicKey::from_bytes(public)?;

        if key.public_key().0 != declared.0 {
            return Err(PasetoError::InvalidKey);
        }

        Ok(key)
    }

    /// Expand a 32-byte Ed25519 seed into a signing key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self(*seed, ExpandedSecretKey::from(seed))
    }

    /// Generate a fresh keypair from the caller's entropy source.
    pub fn random<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, PasetoError> {
        let mut seed = [0; 32];
        rng.try_fill_bytes(&mut seed)
            .map_err(|_| PasetoError::EntropyError)?;

        let key = Self::from_seed(&seed);
        seed.zeroize();
        Ok(key)
    }

    /// The 64-byte wire form: seed followed by public key.
    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        let mut bytes = [0; 64];
        bytes[..32].copy_from_slice(&self.0);
        bytes[32..].copy_from_slice(self.public_key().0.as_bytes());
        bytes
    }

    /// Derive the verification key for tokens signed with this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey((&self.1).into())
    }
}

/// An Ed25519 verification key for `v4.public` tokens.
#[derive(Clone, Debug)]
pub struct PublicKey(pub(crate) VerifyingKey);

impl PublicKey {
    /// Accepts exactly 32 bytes encoding a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasetoError> {
        let key = bytes.try_into().map_err(|_| PasetoError::InvalidKey)?;
        VerifyingKey::from_bytes(&key)
            .map(Self)
            .map_err(|_| PasetoError::InvalidKey)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}
