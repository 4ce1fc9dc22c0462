//! # Blockpress Core
//!
//! A block based image compressor modeled on baseline JPEG. An image is cut
//! into 8×8 blocks, each channel of a block is transformed, quantized,
//! zigzag ordered and run-length coded. Four Huffman tables are derived from
//! the symbol statistics of the whole image and stored in front of the coded
//! blocks, so a container can be decoded without any external information
//! besides the image dimensions.
//!
//! # Usage Examples
//!
//! ## Compress an image and write the reconstruction next to it
//!
//! ```rust
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let input = temp_dir.path().join("gradient.png");
//! image::RgbImage::from_fn(20, 12, |x, y| image::Rgb([x as u8 * 10, y as u8 * 20, 90]))
//!     .save(&input)
//!     .expect("Failed to write input image");
//!
//! let output = blockpress_core::api::optimize::prepare()
//!     .with_image(&input)
//!     .with_container(temp_dir.path().join("gradient.bpc"))
//!     .execute()
//!     .expect("Failed to optimize image");
//!
//! assert_eq!(output, temp_dir.path().join("gradient_optimized.png"));
//! ```
//!
//! ## Work with the container directly
//!
//! ```rust
//! use blockpress_core::media::YCbCrImage;
//! use blockpress_core::pipeline::{BlockGrid, Decoder, Encoder};
//!
//! let image = YCbCrImage::new(16, 8);
//! let bytes = Encoder::default().encode_to_vec(&image).unwrap();
//! let restored = Decoder::default()
//!     .decode(&bytes[..], BlockGrid::covering(16, 8))
//!     .unwrap();
//! assert_eq!(restored, image);
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod bits;
pub mod coefficients;
pub mod commands;
pub mod container;
pub mod error;
pub mod huffman;
pub mod matrix;
pub mod media;
pub mod options;
pub mod pipeline;
pub mod quantize;
pub mod rle;
pub mod tables;
pub mod transform;
pub mod zigzag;

pub use bits::BitString;
pub use coefficients::{CoefficientPair, ImageCoefficients};
pub use error::{CodecError, Result};
pub use options::CodecOptions;
pub use pipeline::{BlockGrid, Decoder, Encoder};
pub use rle::RunSize;
pub use tables::{CodeTables, SymbolClass};
