//! Token assembly and parsing.
//!
//! A v4 token is `header || base64url(body)`, optionally followed by
//! `.` and `base64url(footer)`. Splitting and decoding happen here,
//! before any cryptography; nothing a parser produces is trusted until
//! the MAC or signature over it verifies.

use core::fmt;

use subtle::ConstantTimeEq;

use crate::{PasetoError, base64};

pub const LOCAL_HEADER: &str = "v4.local.";
pub const PUBLIC_HEADER: &str = "v4.public.";

/// A sealed token ready for the wire. `Display` produces the canonical
/// dot-separated form; the footer segment is omitted when empty.
pub struct Token<'a> {
    pub header: &'static str,
    pub body: &'a [u8],
    pub footer: &'a [u8],
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header)?;
        base64::encode(self.body, f)?;

        if !self.footer.is_empty() {
            f.write_str(".")?;
            base64::encode(self.footer, f)?;
        }

        Ok(())
    }
}

/// A token split into decoded segments, with nothing verified yet.
#[derive(Debug)]
pub struct UntrustedToken {
    pub body: Vec<u8>,
    footer: Vec<u8>,
}

impl UntrustedToken {
    /// Strict split: the header must match byte-for-byte (no case folding,
    /// no trimming), and at most one extra segment may follow the body. A
    /// second `.` lands inside the footer segment and fails base64.
    pub fn parse(header: &'static str, token: &str) -> Result<Self, PasetoError> {
        let s = token.strip_prefix(header).ok_or(PasetoError::InvalidToken)?;

        let (body, footer) = match s.split_once('.') {
            Some((body, footer)) => (body, Some(footer)),
            None => (s, None),
        };

        let body = base64::decode_vec(body)?;
        let footer = footer
            .map(base64::decode_vec)
            .transpose()?
            .unwrap_or_default();

        Ok(Self { body, footer })
    }

    /// The decoded wire footer must equal the caller's expected footer
    /// exactly. Compared in constant time to keep the failure mode
    /// indistinguishable from a tag mismatch to a timing observer.
    pub fn check_footer(&self, expected: &[u8]) -> Result<(), PasetoError> {
        if self.footer.ct_eq(expected).into() {
            Ok(())
        } else {
            Err(PasetoError::FooterMismatch)
        }
    }
}
