//! Fixed-width big-endian integers used by the packed filter layouts

use std::fmt;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// An unsigned integer holding the leading bytes of a key in big-endian
/// order, so integer order equals byte-lexicographic order.
pub trait PackedInt:
    Copy
    + Default
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const BITS: u32;
    const BYTES: usize;
    const ZERO: Self;
    const ONE: Self;

    /// Read the first `BYTES` bytes big-endian, zero-filling a short input
    fn from_be_prefix(bytes: &[u8]) -> Self;

    /// Write the big-endian encoding into `out`, truncated to its length
    fn write_be(self, out: &mut [u8]);

    fn leading_ones(self) -> u32;

    fn trailing_zeros(self) -> u32;

    fn count_ones(self) -> u32;

    fn wrapping_add(self, rhs: Self) -> Self;

    /// Big-endian bytes as a vector
    fn to_be_vec(self) -> Vec<u8> {
        let mut out = vec![0u8; Self::BYTES];
        self.write_be(&mut out);
        out
    }
}

macro_rules! impl_packed_int {
    ($($t:ty),*) => {
        $(
            impl PackedInt for $t {
                const BITS: u32 = <$t>::BITS;
                const BYTES: usize = std::mem::size_of::<$t>();
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn from_be_prefix(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    <$t>::from_be_bytes(buf)
                }

                #[inline]
                fn write_be(self, out: &mut [u8]) {
                    let bytes = self.to_be_bytes();
                    let n = out.len().min(bytes.len());
                    out[..n].copy_from_slice(&bytes[..n]);
                }

                #[inline]
                fn leading_ones(self) -> u32 {
                    <$t>::leading_ones(self)
                }

                #[inline]
                fn trailing_zeros(self) -> u32 {
                    <$t>::trailing_zeros(self)
                }

                #[inline]
                fn count_ones(self) -> u32 {
                    <$t>::count_ones(self)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }
            }
        )*
    };
}

impl_packed_int!(u32, u64, u128);

/// Mask with every bit of the first `bytes - 1` bytes set and `tail`
/// as the final byte.
pub fn prefix_mask<I: PackedInt>(bytes: usize, tail: u8) -> I {
    let mut raw = vec![0u8; I::BYTES];
    if bytes > 0 {
        raw[..bytes - 1].fill(0xFF);
        raw[bytes - 1] = tail;
    }
    I::from_be_prefix(&raw)
}
