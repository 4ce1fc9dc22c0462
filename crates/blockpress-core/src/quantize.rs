//! Quantization against the two fixed tables.
//!
//! Quantization is the only lossy step of the codec besides the transform
//! itself. The tables are the example tables of ITU-T T.81 Annex K.

use crate::error::{CodecError, Result};
use crate::matrix::{Matrix, BLOCK_LEN, BLOCK_SIDE};

/// Role of a channel, selects the quantization table and the symbol classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    Luma,
    Chroma,
}

impl ChannelRole {
    /// Channel 0 is luma, channels 1 and 2 are chroma.
    #[inline]
    pub fn of_channel(channel: usize) -> Self {
        if channel == 0 {
            ChannelRole::Luma
        } else {
            ChannelRole::Chroma
        }
    }
}

/// Quantization table: 64 values in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    values: [u16; BLOCK_LEN],
}

#[rustfmt::skip]
const LUMA_VALUES: [u16; BLOCK_LEN] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

#[rustfmt::skip]
const CHROMA_VALUES: [u16; BLOCK_LEN] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

impl QuantTable {
    pub const LUMA: QuantTable = QuantTable { values: LUMA_VALUES };
    pub const CHROMA: QuantTable = QuantTable { values: CHROMA_VALUES };

    pub const fn new(values: [u16; BLOCK_LEN]) -> Self {
        Self { values }
    }

    pub fn for_role(role: ChannelRole) -> &'static QuantTable {
        match role {
            ChannelRole::Luma => &Self::LUMA,
            ChannelRole::Chroma => &Self::CHROMA,
        }
    }

    #[inline]
    pub fn values(&self) -> &[u16; BLOCK_LEN] {
        &self.values
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (BLOCK_SIDE, BLOCK_SIDE)
    }
}

fn check_shape<T>(block: &Matrix<T>, table: &QuantTable) -> Result<()> {
    if block.shape() != table.shape() {
        return Err(CodecError::ShapeMismatch {
            block: block.shape(),
            table: table.shape(),
        });
    }
    Ok(())
}

/// Elementwise `round(block / table)`, halves rounded to even.
pub fn quantize(block: &Matrix<f64>, table: &QuantTable) -> Result<Matrix<i32>> {
    check_shape(block, table)?;
    let data = block
        .as_slice()
        .iter()
        .zip(table.values.iter())
        .map(|(&v, &q)| (v / q as f64).round_ties_even() as i32)
        .collect();
    Ok(Matrix::from_vec(BLOCK_SIDE, BLOCK_SIDE, data))
}

/// Elementwise `block * table`.
pub fn dequantize(block: &Matrix<i32>, table: &QuantTable) -> Result<Matrix<i32>> {
    check_shape(block, table)?;
    let data = block
        .as_slice()
        .iter()
        .zip(table.values.iter())
        .map(|(&v, &q)| v * q as i32)
        .collect();
    Ok(Matrix::from_vec(BLOCK_SIDE, BLOCK_SIDE, data))
}
