//! Pixel I/O and colour conversion around the codec.

use std::path::Path;

pub use image::{Rgb, RgbImage};
use image::ImageError;
use log::error;

use crate::coefficients::CHANNELS;
use crate::error::{CodecError, Result};

/// Loads any supported image file as 8-bit RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| {
        error!("Error reading image {path:?}: {e}");
        match e {
            ImageError::IoError(source) => CodecError::ReadError {
                path: path.to_path_buf(),
                source,
            },
            other => CodecError::Image(other),
        }
    })?;
    Ok(image.to_rgb8())
}

/// Saves `image` with the format implied by the extension of `path`.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(CodecError::NoSuchDirectory(parent.to_path_buf()));
        }
    }

    image.save(path).map_err(|e| {
        error!("Error saving image {path:?}: {e}");
        match e {
            ImageError::IoError(source) => CodecError::WriteError {
                path: path.to_path_buf(),
                source,
            },
            other => CodecError::Image(other),
        }
    })
}

#[inline]
fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Full range YCbCr image (JFIF), one plane per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YCbCrImage {
    width: u32,
    height: u32,
    planes: [Vec<u8>; CHANNELS],
}

impl YCbCrImage {
    /// A black image.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            planes: [vec![0; len], vec![128; len], vec![128; len]],
        }
    }

    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut ycbcr = Self::new(width, height);

        for (i, Rgb([r, g, b])) in image.pixels().enumerate() {
            let (r, g, b) = (*r as f64, *g as f64, *b as f64);
            ycbcr.planes[0][i] = to_u8(0.299 * r + 0.587 * g + 0.114 * b);
            ycbcr.planes[1][i] = to_u8(128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b);
            ycbcr.planes[2][i] = to_u8(128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b);
        }
        ycbcr
    }

    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = self.index(x, y);
            let luma = self.planes[0][i] as f64;
            let cb = self.planes[1][i] as f64 - 128.0;
            let cr = self.planes[2][i] as f64 - 128.0;
            Rgb([
                to_u8(luma + 1.402 * cr),
                to_u8(luma - 0.344136 * cb - 0.714136 * cr),
                to_u8(luma + 1.772 * cb),
            ])
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn sample(&self, channel: usize, x: u32, y: u32) -> u8 {
        self.planes[channel][self.index(x, y)]
    }

    #[inline]
    pub fn set_sample(&mut self, channel: usize, x: u32, y: u32, value: u8) {
        let i = self.index(x, y);
        self.planes[channel][i] = value;
    }

    pub fn plane(&self, channel: usize) -> &[u8] {
        &self.planes[channel]
    }
}

/// Lays `reconstructed` over the top left corner of a copy of `original`.
///
/// Rows and columns that do not fill a whole block are never encoded, they
/// keep the pixels of the original.
pub fn copy_uncovered_region(original: &RgbImage, reconstructed: &RgbImage) -> RgbImage {
    let mut composed = original.clone();
    let (width, height) = reconstructed.dimensions();
    for y in 0..height.min(original.height()) {
        for x in 0..width.min(original.width()) {
            composed.put_pixel(x, y, *reconstructed.get_pixel(x, y));
        }
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_gray_converts_exactly() {
        let image = RgbImage::from_fn(16, 1, |x, _| {
            let v = (x * 17) as u8;
            Rgb([v, v, v])
        });
        let ycbcr = YCbCrImage::from_rgb(&image);
        assert!(ycbcr.plane(1).iter().all(|&cb| cb == 128));
        assert!(ycbcr.plane(2).iter().all(|&cr| cr == 128));
        assert_eq!(ycbcr.sample(0, 15, 0), 255);
        assert_eq!(ycbcr.to_rgb(), image);
    }

    #[test]
    fn test_colour_roundtrip_is_close() {
        let image = RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 32) as u8, (y * 32) as u8, (255 - x * y * 4) as u8])
        });
        let restored = YCbCrImage::from_rgb(&image).to_rgb();
        for (a, b) in image.pixels().zip(restored.pixels()) {
            for c in 0..3 {
                assert!((a[c] as i16 - b[c] as i16).abs() <= 2, "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_save_and_load_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        let image = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8, y as u8, 7]));

        save_image(&image, &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), image);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("pixels.png");
        let image = RgbImage::new(1, 1);

        assert!(matches!(
            save_image(&image, &path),
            Err(CodecError::NoSuchDirectory(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_image(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(CodecError::ReadError { .. })));
    }

    #[test]
    fn test_copy_uncovered_region() {
        let original = RgbImage::from_pixel(10, 9, Rgb([1, 2, 3]));
        let reconstructed = RgbImage::from_pixel(8, 8, Rgb([9, 9, 9]));

        let composed = copy_uncovered_region(&original, &reconstructed);
        assert_eq!(composed.dimensions(), (10, 9));
        assert_eq!(composed.get_pixel(7, 7), &Rgb([9, 9, 9]));
        assert_eq!(composed.get_pixel(8, 0), &Rgb([1, 2, 3]));
        assert_eq!(composed.get_pixel(0, 8), &Rgb([1, 2, 3]));
    }
}
