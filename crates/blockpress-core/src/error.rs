//! Error types for the block codec.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while compressing or reconstructing an image.
///
/// Every variant is terminal for the image being processed: a single bad code
/// corrupts the bit cursor for all following blocks, there is no recovery.
#[derive(Error)]
pub enum CodecError {
    /// A value does not fit into the fixed number of bits reserved for it.
    #[error("value {value} does not fit into {width} bits")]
    ValueTooWide { value: u64, width: u8 },

    /// A zigzag sequence can only be folded back into a square block.
    #[error("length of zigzag sequence should be a perfect square, got {len}")]
    NotSquare { len: usize },

    /// Elementwise operations require equally shaped matrices.
    #[error("shape mismatch: block is {block:?} but table is {table:?}")]
    ShapeMismatch {
        block: (usize, usize),
        table: (usize, usize),
    },

    /// A symbol was about to be encoded that has no code in its table.
    #[error("symbol {symbol} is missing from the {class} table")]
    MissingSymbol { symbol: String, class: &'static str },

    /// Huffman codes are limited to 64 bits.
    #[error("huffman code of {len} bits exceeds the maximum of 64 bits")]
    CodeTooLong { len: usize },

    /// Two codes in one table where one is a prefix of the other.
    #[error("huffman table is not prefix free")]
    AmbiguousCode,

    /// The accumulated bits do not lead to any symbol of the table.
    #[error("invalid huffman code in stream")]
    InvalidHuffmanCode,

    /// Run-length expansion would write past the 63 AC slots of a block.
    #[error("AC coefficient cursor overrun: {cursor} slots exceed 63")]
    AcOverrun { cursor: usize },

    /// Decoded blocks and the target image disagree with the block grid.
    #[error("grid of {blocks_wide}x{blocks_tall} blocks does not match {actual}")]
    GridMismatch {
        blocks_wide: u32,
        blocks_tall: u32,
        actual: String,
    },

    /// A table section read from a container is inconsistent.
    #[error("corrupt table section: {reason}")]
    CorruptTable { reason: String },

    /// The bit stream ended before the current field was complete.
    #[error("unexpected end of container stream")]
    UnexpectedEof,

    /// The directory of an output file does not exist.
    #[error("No such directory: {}", .0.display())]
    NoSuchDirectory(PathBuf),

    /// Represents a failure to read from input.
    #[error("Read error on {}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a failure to write target file.
    #[error("Write error on {}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input file has no extension to derive the output format from.
    #[error("Media format is not supported: {}", .0.display())]
    UnsupportedMedia(PathBuf),

    /// Pixel decoding or encoding failed.
    #[error("image codec error")]
    Image(#[from] image::ImageError),

    /// I/O error during bit operations.
    #[error("bit I/O error: {0}")]
    BitIo(#[source] std::io::Error),

    #[error("API Error: No input image set")]
    InputNotSet,
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::UnexpectedEof
        } else {
            CodecError::BitIo(e)
        }
    }
}

impl fmt::Debug for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}
