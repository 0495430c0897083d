//! `v4.local`: XChaCha20 encryption authenticated with keyed BLAKE2b.
//!
//! The wire body is `nonce (32) || ciphertext || tag (32)`. Two keyed
//! BLAKE2b calls with distinct domain separators derive the cipher key,
//! the cipher nonce, and the MAC key from the master key and the token
//! nonce, so the cipher and MAC subkeys are independent. Decryption
//! recomputes and checks the tag before touching the ciphertext.

use blake2::Blake2bMac;
use chacha20::XChaCha20;
use cipher::{ArrayLength, KeyIvInit, StreamCipher};
use digest::Mac;
use digest::consts::{U32, U56, U64};
use digest::typenum::{IsLessOrEqual, LeEq, NonZero};
use generic_array::GenericArray;
use generic_array::sequence::Split;
use rand_core::TryCryptoRng;
use zeroize::Zeroize;

use crate::PasetoError;
use crate::key::LocalKey;
use crate::pae::{DigestWriter, pre_auth_encode};
use crate::token::{LOCAL_HEADER, Token, UntrustedToken};

impl LocalKey {
    /// Encrypt `payload` into a `v4.local.` token, drawing the 32-byte
    /// token nonce from `rng`.
    ///
    /// The footer is carried on the wire and authenticated; the implicit
    /// assertion is authenticated but never transmitted. Both may be
    /// empty.
    pub fn encrypt<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        payload: &[u8],
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<String, PasetoError> {
        let mut nonce = [0; 32];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|_| PasetoError::EntropyError)?;

        self.dangerous_encrypt_with_nonce(&nonce, payload, footer, implicit)
    }

    /// Encrypt with a caller-chosen nonce. Use [`LocalKey::encrypt`]
    /// instead: reusing a nonce under the same key lets an attacker
    /// recover the keystream. This entry point exists so the published
    /// test vectors can be reproduced byte-for-byte.
    pub fn dangerous_encrypt_with_nonce(
        &self,
        nonce: &[u8; 32],
        payload: &[u8],
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<String, PasetoError> {
        let (mut cipher, mut mac) = self.subkeys(nonce);

        let mut body = Vec::with_capacity(64 + payload.len());
        body.extend_from_slice(nonce);
        body.extend_from_slice(payload);
        cipher.apply_keystream(&mut body[32..]);

        preauth(&mut mac, nonce, &body[32..], footer, implicit);
        body.extend_from_slice(&mac.finalize().into_bytes());

        Ok(Token {
            header: LOCAL_HEADER,
            body: &body,
            footer,
        }
        .to_string())
    }

    /// Decrypt a `v4.local.` token, checking the footer and the implicit
    /// assertion against the values the token was created with.
    ///
    /// The tag is verified in constant time before any decryption; on
    /// failure no plaintext and no derived key material escapes.
    pub fn decrypt(
        &self,
        token: &str,
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<Vec<u8>, PasetoError> {
        let token = UntrustedToken::parse(LOCAL_HEADER, token)?;
        token.check_footer(footer)?;

        let mut body = token.body;
        let (ciphertext, tag) = body
            .split_last_chunk_mut::<32>()
            .ok_or(PasetoError::InvalidToken)?;
        let (nonce, ciphertext) = ciphertext
            .split_first_chunk_mut::<32>()
            .ok_or(PasetoError::InvalidToken)?;
        let nonce: &[u8; 32] = nonce;
        let tag: &[u8; 32] = tag;

        let (mut cipher, mut mac) = self.subkeys(nonce);
        preauth(&mut mac, nonce, ciphertext, footer, implicit);
        mac.verify(tag.into())
            .map_err(|_| PasetoError::CryptoError)?;
        cipher.apply_keystream(ciphertext);

        Ok(ciphertext.to_vec())
    }

    /// Derive the cipher and MAC states for one token nonce. The subkey
    /// buffers are wiped as soon as the states are initialised.
    fn subkeys(&self, nonce: &[u8; 32]) -> (XChaCha20, Blake2bMac<U32>) {
        let (mut ek, mut n2) = kdf::<U56>(&self.0, b"paseto-encryption-key", nonce).split();
        let cipher = XChaCha20::new(&ek, &n2);
        ek.as_mut_slice().zeroize();
        n2.as_mut_slice().zeroize();

        let mut ak: GenericArray<u8, U32> = kdf(&self.0, b"paseto-auth-key-for-aead", nonce);
        let mac = Blake2bMac::new_from_slice(&ak).expect("key should be valid");
        ak.as_mut_slice().zeroize();

        (cipher, mac)
    }
}

/// Keyed BLAKE2b with the requested output length; the length is bound
/// into the hash parameters, so the 56- and 32-byte derivations differ
/// even before the domain separator does.
fn kdf<O>(key: &[u8; 32], sep: &'static [u8], nonce: &[u8; 32]) -> GenericArray<u8, O>
where
    O: ArrayLength<u8> + IsLessOrEqual<U64>,
    LeEq<O, U64>: NonZero,
{
    let mut mac = Blake2bMac::<O>::new_from_slice(key).expect("key should be valid");
    mac.update(sep);
    mac.update(nonce);
    mac.finalize().into_bytes()
}

fn preauth(
    mac: &mut Blake2bMac<U32>,
    nonce: &[u8],
    ciphertext: &[u8],
    footer: &[u8],
    implicit: &[u8],
) {
    pre_auth_encode(
        [
            &[LOCAL_HEADER.as_bytes()],
            &[nonce],
            &[ciphertext],
            &[footer],
            &[implicit],
        ],
        DigestWriter(mac),
    )
}
