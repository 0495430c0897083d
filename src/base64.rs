//! Constant-time unpadded base64url.
//!
//! PASETO requires the RFC 4648 §5 alphabet with no `=` padding, and
//! rejects anything that does not round-trip exactly.
//!
//! The bit manipulation is taken from `base64ct`, licensed from the
//! RustCrypto developers under Apache-2.0
//! (<https://github.com/RustCrypto/formats/blob/master/base64ct/LICENSE-APACHE>),
//! reworked to stream the encoding into any [`fmt::Write`] sink.
#![allow(unsafe_code)]

use core::fmt;

use crate::PasetoError;

pub fn encode(bytes: &[u8], out: &mut impl fmt::Write) -> fmt::Result {
    let mut tmp = [0; 4];

    let (chunks, rem) = bytes.as_chunks::<3>();
    for s in chunks {
        encode_3bytes(s, &mut tmp);
        // SAFETY: `encode_3bytes` only emits bytes from the base64url
        // alphabet, which are single-byte UTF-8 chars
        out.write_str(unsafe { core::str::from_utf8_unchecked(&tmp) })?;
    }

    let last = encode_last(rem, &mut tmp);
    out.write_str(unsafe { core::str::from_utf8_unchecked(last) })
}

fn encode_last<'a>(bytes: &[u8], dst: &'a mut [u8; 4]) -> &'a [u8] {
    let tmp;
    let len = match *bytes {
        [] => {
            tmp = [0; 3];
            0
        }
        [a] => {
            tmp = [a, 0, 0];
            2
        }
        [a, b] => {
            tmp = [a, b, 0];
            3
        }
        [a, b, c, ..] => {
            tmp = [a, b, c];
            4
        }
    };

    encode_3bytes(&tmp, dst);
    &dst[..len]
}

pub fn decode_vec(src: &str) -> Result<Vec<u8>, PasetoError> {
    let mut dst = vec![0; decoded_len(src.len())];
    decode_inner(src, &mut dst)?;
    Ok(dst)
}

fn decode_inner(src: &str, dst: &mut [u8]) -> Result<(), PasetoError> {
    let (src_chunks, src_rem) = src.as_bytes().as_chunks::<4>();
    let (dst_chunks, dst_rem) = dst.as_chunks_mut::<3>();

    let mut err = 0;
    for (s, d) in core::iter::zip(src_chunks, dst_chunks) {
        err |= decode_3bytes(s, d);
    }

    // an unpadded tail of 1 char encodes fewer than 8 bits, so it is never valid
    err |= !(src_rem.is_empty() || src_rem.len() >= 2) as i16;
    let mut tmp_out = [0u8; 3];
    let mut tmp_in = [b'A'; 4];
    tmp_in[..src_rem.len()].copy_from_slice(src_rem);
    err |= decode_3bytes(&tmp_in, &mut tmp_out);
    dst_rem.copy_from_slice(&tmp_out[..dst_rem.len()]);

    if err == 0 {
        validate_last_block(src.as_bytes(), dst)
    } else {
        Err(PasetoError::InvalidToken)
    }
}

/// Reject non-canonical encodings: the last block must round-trip back to
/// the exact input characters, so stray trailing bits are an error.
fn validate_last_block(encoded: &[u8], decoded: &[u8]) -> Result<(), PasetoError> {
    if encoded.is_empty() && decoded.is_empty() {
        return Ok(());
    }

    fn last_block_start(bytes: &[u8], block_size: usize) -> usize {
        (bytes.len().saturating_sub(1) / block_size) * block_size
    }

    let enc_block = encoded
        .get(last_block_start(encoded, 4)..)
        .ok_or(PasetoError::InvalidToken)?;

    let dec_block = decoded
        .get(last_block_start(decoded, 3)..)
        .ok_or(PasetoError::InvalidToken)?;

    let mut buf = [0u8; 4];
    let bytes = encode_last(dec_block, &mut buf);

    // non-short-circuiting comparison
    if bytes
        .iter()
        .zip(enc_block.iter())
        .fold(0, |acc, (a, b)| acc | (a ^ b))
        == 0
    {
        Ok(())
    } else {
        Err(PasetoError::InvalidToken)
    }
}

/// Decoded length of an *unpadded* input of `input_len` characters.
///
/// Exact for well-formed input; `decode_inner` catches the `4k + 1` case.
#[inline(always)]
fn decoded_len(input_len: usize) -> usize {
    // overflow-proof computation of `(3*n)/4`
    let k = input_len / 4;
    let l = input_len - 4 * k;
    3 * k + (3 * l) / 4
}

/// Decode 3 bytes of a base64 message.
#[inline(always)]
fn decode_3bytes(src: &[u8; 4], dst: &mut [u8; 3]) -> i16 {
    let c0 = decode_6bits(src[0]);
    let c1 = decode_6bits(src[1]);
    let c2 = decode_6bits(src[2]);
    let c3 = decode_6bits(src[3]);

    dst[0] = ((c0 << 2) | (c1 >> 4)) as u8;
    dst[1] = ((c1 << 4) | (c2 >> 2)) as u8;
    dst[2] = ((c2 << 6) | c3) as u8;

    ((c0 | c1 | c2 | c3) >> 8) & 1
}

/// Decode 6 bits of a base64 message without data-dependent branches.
fn decode_6bits(src: u8) -> i16 {
    let mut ret: i16 = -1;

    ret += ((((b'A' as i16 - 1) - src as i16) & (src as i16 - (b'Z' as i16 + 1))) >> 8)
        & (src as i16 + -64);

    ret += ((((b'a' as i16 - 1) - src as i16) & (src as i16 - (b'z' as i16 + 1))) >> 8)
        & (src as i16 + -70);

    ret += ((((b'0' as i16 - 1) - src as i16) & (src as i16 - (b'9' as i16 + 1))) >> 8)
        & (src as i16 + 5);

    ret += ((((b'-' as i16 - 1) - src as i16) & (src as i16 - (b'-' as i16 + 1))) >> 8) & 63;
    ret += ((((b'_' as i16 - 1) - src as i16) & (src as i16 - (b'_' as i16 + 1))) >> 8) & 64;

    ret
}

/// Encode 3 bytes of a base64 message.
#[inline(always)]
fn encode_3bytes(src: &[u8; 3], dst: &mut [u8; 4]) {
    let b0 = src[0] as i16;
    let b1 = src[1] as i16;
    let b2 = src[2] as i16;

    dst[0] = encode_6bits(b0 >> 2);
    dst[1] = encode_6bits(((b0 << 4) | (b1 >> 4)) & 63);
    dst[2] = encode_6bits(((b1 << 2) | (b2 >> 6)) & 63);
    dst[3] = encode_6bits(b2 & 63);
}

/// Encode 6 bits of a base64 message without data-dependent branches.
#[inline(always)]
fn encode_6bits(src: i16) -> u8 {
    let mut diff = src + b'A' as i16;

    diff += ((25 - src) >> 8) & 6;
    diff += ((51 - src) >> 8) & -75;
    diff += ((61 - src) >> 8) & -(b'-' as i16 - 0x20);
    diff += ((62 - src) >> 8) & (b'_' as i16 - b'-' as i16 - 1);

    diff as u8
}
