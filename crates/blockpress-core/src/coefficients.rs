//! Quantized coefficients of a whole image, split into DC and AC parts.

use crate::matrix::BLOCK_LEN;
use crate::rle::AC_LEN;

/// Channels per block: luma followed by two chroma channels.
pub const CHANNELS: usize = 3;

/// Coefficients of one channel of one block, in zigzag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientPair {
    /// Zigzag element 0.
    pub dc: i32,
    /// Zigzag elements 1 to 63.
    pub ac: [i32; AC_LEN],
}

impl Default for CoefficientPair {
    fn default() -> Self {
        Self {
            dc: 0,
            ac: [0; AC_LEN],
        }
    }
}

impl CoefficientPair {
    pub fn new(dc: i32, ac: [i32; AC_LEN]) -> Self {
        Self { dc, ac }
    }

    /// Splits a 64 element zigzag sequence.
    ///
    /// # Panics
    /// If `zigzag` does not hold exactly 64 values.
    pub fn from_zigzag(zigzag: &[i32]) -> Self {
        assert_eq!(zigzag.len(), BLOCK_LEN, "zigzag sequence must hold 64 values");
        let mut ac = [0; AC_LEN];
        ac.copy_from_slice(&zigzag[1..]);
        Self { dc: zigzag[0], ac }
    }

    /// Joins DC and AC back into one zigzag sequence.
    pub fn to_zigzag(&self) -> [i32; BLOCK_LEN] {
        let mut zigzag = [0; BLOCK_LEN];
        zigzag[0] = self.dc;
        zigzag[1..].copy_from_slice(&self.ac);
        zigzag
    }
}

/// All three channels of one block.
pub type BlockCoefficients = [CoefficientPair; CHANNELS];

/// Coefficients of every block of an image, in block raster order.
///
/// Held in full because Huffman codes can only be fixed once every
/// coefficient of the image has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCoefficients {
    blocks: Vec<BlockCoefficients>,
}

impl ImageCoefficients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(blocks: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(blocks),
        }
    }

    pub fn push(&mut self, block: BlockCoefficients) {
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, index: usize) -> &BlockCoefficients {
        &self.blocks[index]
    }

    pub fn blocks(&self) -> &[BlockCoefficients] {
        &self.blocks
    }

    /// Channel values of every block for the given channel indices.
    pub fn channels<'a>(
        &'a self,
        channels: &'a [usize],
    ) -> impl Iterator<Item = &'a CoefficientPair> + 'a {
        self.blocks
            .iter()
            .flat_map(move |block| channels.iter().map(move |&c| &block[c]))
    }
}

impl FromIterator<BlockCoefficients> for ImageCoefficients {
    fn from_iter<I: IntoIterator<Item = BlockCoefficients>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
