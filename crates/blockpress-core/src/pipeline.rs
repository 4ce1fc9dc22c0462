//! Encoding and decoding of whole images.
//!
//! Encoding runs in two passes: [`Encoder::analyze`] produces the quantized
//! coefficients of every block, [`Encoder::build_tables`] derives the code
//! tables from all of them and only then [`Encoder::write`] emits the
//! container. Decoding mirrors this with [`Decoder::read`] and
//! [`Decoder::reconstruct`].

use std::io::{Read, Write};
use std::time::Instant;

use log::{debug, info};

use crate::coefficients::{CoefficientPair, ImageCoefficients, CHANNELS};
use crate::container::{ContainerReader, ContainerWriter};
use crate::error::{CodecError, Result};
use crate::matrix::{Matrix, BLOCK_SIDE};
use crate::media::YCbCrImage;
use crate::quantize::{dequantize, quantize, ChannelRole, QuantTable};
use crate::tables::{CodeTables, DecodeTables};
use crate::transform::{Dct2d, Transform};
use crate::zigzag::{block_to_zigzag, zigzag_to_block};

const SIDE: u32 = BLOCK_SIDE as u32;

/// Level shift between unsigned samples and the signed transform input.
const LEVEL_SHIFT: f64 = 128.0;

/// Upper bound for blocks reserved up front while reading a container.
const MAX_RESERVED_BLOCKS: usize = 1 << 16;

/// Whole blocks that fit into an image, partial rows and columns dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockGrid {
    pub blocks_wide: u32,
    pub blocks_tall: u32,
}

impl BlockGrid {
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            blocks_wide: width / SIDE,
            blocks_tall: height / SIDE,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks_wide as usize * self.blocks_tall as usize
    }

    /// Dimensions of the covered region in pixels.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (self.blocks_wide * SIDE, self.blocks_tall * SIDE)
    }

    /// Top left pixel of the block at raster position `index`.
    #[inline]
    pub fn origin(&self, index: usize) -> (u32, u32) {
        let wide = self.blocks_wide as usize;
        ((index % wide) as u32 * SIDE, (index / wide) as u32 * SIDE)
    }
}

pub struct Encoder<T: Transform = Dct2d> {
    transform: T,
}

impl Default for Encoder<Dct2d> {
    fn default() -> Self {
        Self::new(Dct2d)
    }
}

impl<T: Transform> Encoder<T> {
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    /// Quantized zigzag coefficients of every whole block of `image`.
    pub fn analyze(&self, image: &YCbCrImage) -> Result<ImageCoefficients> {
        let started = Instant::now();
        let grid = BlockGrid::covering(image.width(), image.height());
        let mut coefficients = ImageCoefficients::with_capacity(grid.block_count());

        for index in 0..grid.block_count() {
            let (x0, y0) = grid.origin(index);
            let mut block = [CoefficientPair::default(); CHANNELS];
            for (channel, pair) in block.iter_mut().enumerate() {
                let samples = Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |r, c| {
                    image.sample(channel, x0 + c as u32, y0 + r as u32) as f64 - LEVEL_SHIFT
                });
                let table = QuantTable::for_role(ChannelRole::of_channel(channel));
                let quantized = quantize(&self.transform.forward(&samples), table)?;
                *pair = CoefficientPair::from_zigzag(&block_to_zigzag(&quantized));
            }
            coefficients.push(block);
        }

        info!(
            "analyzed {}x{} blocks in {:?}",
            grid.blocks_wide,
            grid.blocks_tall,
            started.elapsed()
        );
        Ok(coefficients)
    }

    pub fn build_tables(&self, coefficients: &ImageCoefficients) -> Result<CodeTables> {
        let tables = CodeTables::build(coefficients)?;
        debug!(
            "code tables: dc_luma {}, ac_luma {}, dc_chroma {}, ac_chroma {}",
            tables.dc_luma.len(),
            tables.ac_luma.len(),
            tables.dc_chroma.len(),
            tables.ac_chroma.len()
        );
        Ok(tables)
    }

    /// Writes a complete container and returns the sink.
    pub fn write<W: Write>(
        &self,
        coefficients: &ImageCoefficients,
        tables: &CodeTables,
        writer: W,
    ) -> Result<W> {
        let mut container = ContainerWriter::new(writer);
        container.write_tables(tables)?;
        container.write_block_count(coefficients.len())?;
        for block in coefficients.blocks() {
            container.write_block(block, tables)?;
        }
        container.finish()
    }

    /// Runs both passes and returns the container bytes.
    pub fn encode_to_vec(&self, image: &YCbCrImage) -> Result<Vec<u8>> {
        let coefficients = self.analyze(image)?;
        let tables = self.build_tables(&coefficients)?;
        let bytes = self.write(&coefficients, &tables, Vec::new())?;
        info!("container holds {} blocks in {} bytes", coefficients.len(), bytes.len());
        Ok(bytes)
    }
}

pub struct Decoder<T: Transform = Dct2d> {
    transform: T,
}

impl Default for Decoder<Dct2d> {
    fn default() -> Self {
        Self::new(Dct2d)
    }
}

impl<T: Transform> Decoder<T> {
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    /// Reads tables and all blocks of a container.
    pub fn read<R: Read>(&self, reader: R) -> Result<(CodeTables, ImageCoefficients)> {
        let started = Instant::now();
        let mut container = ContainerReader::new(reader);
        let tables = container.read_tables()?;
        let decode_tables = DecodeTables::new(&tables)?;

        let count = container.read_block_count()? as usize;
        debug!("container announces {} blocks", count);
        // the count is untrusted, a short stream fails on its first missing block
        let mut coefficients = ImageCoefficients::with_capacity(count.min(MAX_RESERVED_BLOCKS));
        for _ in 0..count {
            coefficients.push(container.read_block(&decode_tables)?);
        }

        info!("read {} blocks in {:?}", count, started.elapsed());
        Ok((tables, coefficients))
    }

    /// Turns coefficients back into samples of the blocks of `grid`.
    pub fn reconstruct(
        &self,
        coefficients: &ImageCoefficients,
        grid: BlockGrid,
        image: &mut YCbCrImage,
    ) -> Result<()> {
        if coefficients.len() != grid.block_count() {
            return Err(CodecError::GridMismatch {
                blocks_wide: grid.blocks_wide,
                blocks_tall: grid.blocks_tall,
                actual: format!("{} decoded blocks", coefficients.len()),
            });
        }
        let (width, height) = grid.pixel_dimensions();
        if image.width() < width || image.height() < height {
            return Err(CodecError::GridMismatch {
                blocks_wide: grid.blocks_wide,
                blocks_tall: grid.blocks_tall,
                actual: format!("an image of {}x{} pixels", image.width(), image.height()),
            });
        }

        for (index, block) in coefficients.blocks().iter().enumerate() {
            let (x0, y0) = grid.origin(index);
            for (channel, pair) in block.iter().enumerate() {
                let table = QuantTable::for_role(ChannelRole::of_channel(channel));
                let quantized = zigzag_to_block(&pair.to_zigzag())?;
                let dequantized = dequantize(&quantized, table)?.map(|v| v as f64);
                let samples = self.transform.inverse(&dequantized);

                for r in 0..BLOCK_SIDE {
                    for c in 0..BLOCK_SIDE {
                        let value = (samples[(r, c)] + LEVEL_SHIFT).round().clamp(0.0, 255.0);
                        image.set_sample(channel, x0 + c as u32, y0 + r as u32, value as u8);
                    }
                }
            }
        }
        Ok(())
    }

    /// Reads a container and reconstructs an image of the given grid.
    pub fn decode<R: Read>(&self, reader: R, grid: BlockGrid) -> Result<YCbCrImage> {
        let (_, coefficients) = self.read(reader)?;
        let (width, height) = grid.pixel_dimensions();
        let mut image = YCbCrImage::new(width, height);
        self.reconstruct(&coefficients, grid, &mut image)?;
        Ok(image)
    }
}
