//! PASETO v4 tokens.
//!
//! Implements the two v4 purposes from the PASETO specification:
//!
//! * `v4.local` — authenticated encryption (XChaCha20 + keyed-BLAKE2b) under
//!   a 32-byte symmetric [`LocalKey`].
//! * `v4.public` — Ed25519 signatures over a cleartext message, created with
//!   a [`SecretKey`] and checked with a [`PublicKey`].
//!
//! Payloads and footers are opaque byte strings; this crate does not parse,
//! validate, or even look at them. Claim handling, key management, and the
//! other PASETO versions live elsewhere.
//!
//! Every random draw comes from a caller-supplied [`rand_core::TryCryptoRng`],
//! so the whole crate is deterministic under test and free of global state.
//!
//! ```
//! use paseto4::LocalKey;
//! use rand_core::OsRng;
//!
//! let key = LocalKey::random(&mut OsRng)?;
//!
//! let token = key.encrypt(&mut OsRng, b"call me Ishmael", b"ch.1", b"moby")?;
//! assert!(token.starts_with("v4.local."));
//!
//! let payload = key.decrypt(&token, b"ch.1", b"moby")?;
//! assert_eq!(payload, b"call me Ishmael");
//! # Ok::<(), paseto4::PasetoError>(())
//! ```

#![deny(unsafe_code)]

mod base64;
mod key;
mod local;
mod pae;
mod public;
mod token;

pub use key::{LocalKey, PublicKey, SecretKey};

/// Error returned by every fallible operation in this crate.
///
/// Exactly one variant per failure class; nothing is retried or recovered
/// internally, and no variant carries key or payload material.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasetoError {
    /// A key had the wrong length or did not decode to a valid key.
    InvalidKey,
    /// The entropy source failed or returned short.
    EntropyError,
    /// The token was structurally invalid: wrong header, wrong segment
    /// count, body too short, or a segment that was not canonical unpadded
    /// base64url.
    InvalidToken,
    /// The footer on the wire did not match the expected footer.
    FooterMismatch,
    /// The authentication tag or signature did not verify.
    CryptoError,
    /// An underlying primitive rejected inputs this crate considers valid.
    InternalError,
}

impl std::error::Error for PasetoError {}

impl std::fmt::Display for PasetoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasetoError::InvalidKey => f.write_str("could not parse the key"),
            PasetoError::EntropyError => f.write_str("the entropy source failed"),
            PasetoError::InvalidToken => f.write_str("could not parse the token"),
            PasetoError::FooterMismatch => {
                f.write_str("the token footer did not match the expected footer")
            }
            PasetoError::CryptoError => f.write_str("the token could not be authenticated"),
            PasetoError::InternalError => f.write_str("unexpected cryptographic failure"),
        }
    }
}
