//! `v4.public`: Ed25519 signatures over cleartext messages.
//!
//! The wire body is `message || signature (64)`. The signature covers the
//! PAE of header, message, footer, and implicit assertion, streamed into
//! the signing and verifying states without materialising the encoding.

use ed25519_dalek::{Signature, StreamVerifier, VerifyingKey};
use sha2::Sha512;

use crate::PasetoError;
use crate::key::{PublicKey, SecretKey};
use crate::pae::{DigestWriter, WriteBytes, pre_auth_encode};
use crate::token::{PUBLIC_HEADER, Token, UntrustedToken};

impl SecretKey {
    /// Sign `message` into a `v4.public.` token. The message travels in
    /// the clear; the footer is carried on the wire and signed; the
    /// implicit assertion is signed but never transmitted.
    pub fn sign(
        &self,
        message: &[u8],
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<String, PasetoError> {
        let vk = VerifyingKey::from(&self.1);

        let signature = ed25519_dalek::hazmat::raw_sign_byupdate::<Sha512, _>(
            &self.1,
            |ctx| {
                preauth(DigestWriter(ctx), message, footer, implicit);
                Ok(())
            },
            &vk,
        )
        .map_err(|_| PasetoError::InternalError)?;

        let mut body = Vec::with_capacity(message.len() + 64);
        body.extend_from_slice(message);
        body.extend_from_slice(&signature.to_bytes());

        Ok(Token {
            header: PUBLIC_HEADER,
            body: &body,
            footer,
        }
        .to_string())
    }
}

impl PublicKey {
    /// Verify a `v4.public.` token and return the signed message.
    ///
    /// The message bytes are only released once the signature over the
    /// PAE has verified.
    pub fn verify(
        &self,
        token: &str,
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<Vec<u8>, PasetoError> {
        let token = UntrustedToken::parse(PUBLIC_HEADER, token)?;
        token.check_footer(footer)?;

        let (message, sig) = token
            .body
            .split_last_chunk::<64>()
            .ok_or(PasetoError::InvalidToken)?;
        let signature = Signature::from_bytes(sig);

        let mut verifier = self
            .0
            .verify_stream(&signature)
            .map_err(|_| PasetoError::CryptoError)?;
        preauth(StreamWriter(&mut verifier), message, footer, implicit);
        verifier
            .finalize_and_verify()
            .map_err(|_| PasetoError::CryptoError)?;

        Ok(message.to_vec())
    }
}

struct StreamWriter<'a>(&'a mut StreamVerifier);

impl WriteBytes for StreamWriter<'_> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice);
    }
}

fn preauth(out: impl WriteBytes, message: &[u8], footer: &[u8], implicit: &[u8]) {
    pre_auth_encode(
        [
            &[PUBLIC_HEADER.as_bytes()],
            &[message],
            &[footer],
            &[implicit],
        ],
        out,
    )
}
