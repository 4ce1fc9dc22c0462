//! Fixed-width and sign-aware bit strings.
//!
//! Every field of the container is built from these primitives. Signed
//! coefficients use the JPEG "additional bits" scheme: the width is the
//! category of the value, positive values are stored as their magnitude and
//! negative values as the bitwise complement of their magnitude. This is not
//! two's complement, the leading bit alone tells the sign (1 = positive).

use std::fmt;

use crate::error::{CodecError, Result};

/// Maximum number of bits a [`BitString`] can hold.
pub const MAX_BITS: u8 = 64;

/// An MSB-first sequence of up to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BitString {
    bits: u64,
    len: u8,
}

#[inline]
fn mask(width: u8) -> u64 {
    if width >= MAX_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl BitString {
    /// The zero length bit string.
    pub const EMPTY: BitString = BitString { bits: 0, len: 0 };

    /// The raw bits, right aligned.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, counted from the most significant (first written) bit.
    #[inline]
    pub fn bit(&self, index: u8) -> bool {
        debug_assert!(index < self.len);
        (self.bits >> (self.len - 1 - index)) & 1 == 1
    }

    /// Iterates the bits in stream order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bit(i))
    }

    /// Appends one bit at the least significant end.
    pub fn push(&mut self, bit: bool) -> Result<()> {
        if self.len == MAX_BITS {
            return Err(CodecError::CodeTooLong {
                len: self.len as usize + 1,
            });
        }
        self.bits = (self.bits << 1) | bit as u64;
        self.len += 1;
        Ok(())
    }

    /// Returns a copy with one more bit appended.
    pub fn with(mut self, bit: bool) -> Result<Self> {
        self.push(bit)?;
        Ok(self)
    }

    /// Bitwise complement within the string's own width.
    #[inline]
    pub fn flip(&self) -> BitString {
        BitString {
            bits: !self.bits & mask(self.len),
            len: self.len,
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Number of bits needed to hold the magnitude of `value` (its category).
///
/// `bits_required(0) == 0`.
#[inline]
pub fn bits_required(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Encodes a non-negative integer as exactly `width` bits, MSB first.
pub fn uint_to_binstr(value: u64, width: u8) -> Result<BitString> {
    if width > MAX_BITS || value & !mask(width) != 0 {
        return Err(CodecError::ValueTooWide { value, width });
    }
    Ok(BitString { bits: value, len: width })
}

/// Encodes a signed coefficient with the sign-magnitude-complement scheme.
///
/// The width of the result equals [`bits_required`] of the value.
pub fn int_to_binstr(value: i32) -> BitString {
    let len = bits_required(value);
    let magnitude = value.unsigned_abs() as u64;
    let bits = if value < 0 {
        !magnitude & mask(len)
    } else {
        magnitude
    };
    BitString { bits, len }
}

/// Inverse of [`int_to_binstr`].
///
/// A leading `1` means the pattern is the plain magnitude, a leading `0`
/// means it is the complement of the magnitude of a negative value.
pub fn binstr_to_int(bits: BitString) -> i32 {
    if bits.is_empty() {
        return 0;
    }
    if bits.bit(0) {
        bits.bits() as i32
    } else {
        -(bits.flip().bits() as i32)
    }
}
