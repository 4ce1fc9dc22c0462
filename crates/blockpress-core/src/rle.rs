//! Run-length coding of the 63 AC coefficients of a block.
//!
//! Each nonzero coefficient becomes a `(run, size)` symbol plus value bits,
//! where `run` counts the zeros before it. A run is capped at 15: a zero that
//! arrives while 15 are pending is emitted as `(15, 0)` without value bits and
//! stands for 16 zeros. Once only zeros remain, `(0, 0)` ends the block.

use std::fmt;

use crate::bits::{bits_required, int_to_binstr, BitString};
use crate::error::{CodecError, Result};

/// Number of AC coefficients per block.
pub const AC_LEN: usize = 63;

/// Longest zero run a single symbol can carry.
pub const MAX_RUN: u8 = 15;

/// Largest value category representable in a symbol.
pub const MAX_SIZE: u8 = 15;

/// AC symbol: zero run length and category of the following value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunSize {
    pub run: u8,
    pub size: u8,
}

impl RunSize {
    /// End of block, all remaining coefficients are zero.
    pub const EOB: RunSize = RunSize { run: 0, size: 0 };

    /// Sixteen zeros.
    pub const ZRL: RunSize = RunSize { run: MAX_RUN, size: 0 };

    pub const fn new(run: u8, size: u8) -> Self {
        Self { run, size }
    }

    #[inline]
    pub fn is_eob(&self) -> bool {
        *self == Self::EOB
    }
}

impl fmt::Display for RunSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.run, self.size)
    }
}

/// Symbols of one AC sequence and the value bits that follow each of them.
///
/// `values[i]` belongs to `symbols[i]` and is empty whenever its size is 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLength {
    pub symbols: Vec<RunSize>,
    pub values: Vec<BitString>,
}

impl RunLength {
    fn push(&mut self, symbol: RunSize, value: BitString) {
        self.symbols.push(symbol);
        self.values.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RunSize, &BitString)> {
        self.symbols.iter().zip(self.values.iter())
    }
}

/// Converts an AC sequence into run-length symbols.
///
/// Fails with [`CodecError::ValueTooWide`] if a coefficient needs more than
/// [`MAX_SIZE`] bits.
pub fn run_length_encode(ac: &[i32]) -> Result<RunLength> {
    let last_nonzero = ac.iter().rposition(|&v| v != 0);
    let mut encoded = RunLength::default();
    let mut run_length = 0u8;

    for (i, &elem) in ac.iter().enumerate() {
        if last_nonzero.map_or(true, |last| i > last) {
            encoded.push(RunSize::EOB, BitString::EMPTY);
            break;
        }

        if elem == 0 && run_length < MAX_RUN {
            run_length += 1;
        } else {
            let size = bits_required(elem);
            if size > MAX_SIZE {
                return Err(CodecError::ValueTooWide {
                    value: elem.unsigned_abs() as u64,
                    width: MAX_SIZE,
                });
            }
            encoded.push(RunSize::new(run_length, size), int_to_binstr(elem));
            run_length = 0;
        }
    }

    Ok(encoded)
}

/// Source of AC symbols and value bits for [`run_length_decode`].
///
/// Implemented by the container reader, where both come from one bit cursor.
pub trait AcSource {
    fn next_symbol(&mut self) -> Result<RunSize>;

    /// Reads a signed value of `size` bits, `size` is never 0.
    fn read_value(&mut self, size: u8) -> Result<i32>;
}

/// Expands run-length symbols back into 63 AC coefficients.
pub fn run_length_decode<S: AcSource + ?Sized>(source: &mut S) -> Result<[i32; AC_LEN]> {
    let mut ac = [0i32; AC_LEN];
    let mut cursor = 0usize;

    while cursor < AC_LEN {
        let symbol = source.next_symbol()?;
        if symbol.is_eob() {
            break;
        }

        cursor += symbol.run as usize;
        if cursor >= AC_LEN {
            return Err(CodecError::AcOverrun { cursor: cursor + 1 });
        }

        if symbol.size != 0 {
            ac[cursor] = source.read_value(symbol.size)?;
        }
        cursor += 1;
    }

    Ok(ac)
}
