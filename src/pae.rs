//! Pre-authentication encoding.
//!
//! PAE turns an ordered list of byte strings into a single unambiguous
//! byte string: a count, then each piece prefixed by its length. Both the
//! MAC in `v4.local` and the signature in `v4.public` are computed over a
//! PAE, never over a bare concatenation.

/// A sink for PAE output, so the encoding can stream straight into a MAC
/// or signature state without materialising a buffer.
pub trait WriteBytes {
    fn write(&mut self, slice: &[u8]);
}

impl<W: WriteBytes> WriteBytes for &mut W {
    fn write(&mut self, slice: &[u8]) {
        W::write(self, slice);
    }
}

impl WriteBytes for Vec<u8> {
    fn write(&mut self, slice: &[u8]) {
        self.extend_from_slice(slice)
    }
}

/// Adapts any [`digest::Update`] state into a PAE sink.
pub struct DigestWriter<'a, M: digest::Update>(pub &'a mut M);

impl<M: digest::Update> WriteBytes for DigestWriter<'_, M> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice)
    }
}

/// 8-byte little-endian length word. The PASETO spec requires the top bit
/// to be clear, so mask it rather than rely on lengths staying below 2^63.
fn le64(n: u64, out: &mut impl WriteBytes) {
    out.write(&(n & (u64::MAX >> 1)).to_le_bytes());
}

/// Encode `pieces` into `out`. Each piece is a group of slices treated as
/// one logical byte string, so callers can feed split buffers without
/// concatenating them first.
pub fn pre_auth_encode<const N: usize>(pieces: [&[&[u8]]; N], mut out: impl WriteBytes) {
    le64(N as u64, &mut out);
    for piece in pieces {
        let len: u64 = piece.iter().map(|x| x.len() as u64).sum();
        le64(len, &mut out);
        for x in piece {
            out.write(x);
        }
    }
}
