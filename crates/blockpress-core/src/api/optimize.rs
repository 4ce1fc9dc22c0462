use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::media::{copy_uncovered_region, load_image, save_image, YCbCrImage};
use crate::pipeline::{BlockGrid, Decoder, Encoder};
use crate::{CodecError, CodecOptions, Result};

pub fn prepare() -> OptimizeApi {
    OptimizeApi::default()
}

#[derive(Default, Debug)]
pub struct OptimizeApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    container: Option<PathBuf>,
    options: CodecOptions,
}

impl OptimizeApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Output image, defaults to the input path with the output suffix.
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Also store the compressed container at this path.
    pub fn with_container<A: AsRef<Path>>(mut self, container: A) -> Self {
        self.container = Some(container.as_ref().to_path_buf());
        self
    }

    pub fn use_container<A: AsRef<Path>>(mut self, container: Option<A>) -> Self {
        self.container = container.map(|c| c.as_ref().to_path_buf());
        self
    }

    /// Compresses the image, decodes it again and saves the result.
    ///
    /// Returns the path of the written image.
    pub fn execute(self) -> Result<PathBuf> {
        let Some(image) = self.image else {
            return Err(CodecError::InputNotSet);
        };
        let output = match self.output {
            Some(output) => output,
            None => derive_output_path(&image, &self.options.output_suffix)?,
        };

        let original = load_image(&image)?;
        let grid = BlockGrid::covering(original.width(), original.height());
        info!(
            "{} is {}x{} pixels, {} blocks",
            image.display(),
            original.width(),
            original.height(),
            grid.block_count()
        );

        let bytes = Encoder::default().encode_to_vec(&YCbCrImage::from_rgb(&original))?;
        if let Some(container) = &self.container {
            write_container(container, &bytes)?;
        }

        let reconstructed = Decoder::default().decode(&bytes[..], grid)?.to_rgb();
        let result = if self.options.copy_uncovered_region {
            copy_uncovered_region(&original, &reconstructed)
        } else {
            reconstructed
        };

        save_image(&result, &output)?;
        info!("saved {}", output.display());
        Ok(output)
    }
}

/// `<dir>/<stem><suffix>.<ext>` for an input `<dir>/<stem>.<ext>`.
pub fn derive_output_path(input: &Path, suffix: &str) -> Result<PathBuf> {
    let (Some(stem), Some(extension)) = (input.file_stem(), input.extension()) else {
        return Err(CodecError::UnsupportedMedia(input.to_path_buf()));
    };
    Ok(input.with_file_name(format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        suffix,
        extension.to_string_lossy()
    )))
}

fn write_container(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(CodecError::NoSuchDirectory(parent.to_path_buf()));
        }
    }
    fs::write(path, bytes).map_err(|source| CodecError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {} container bytes to {}", bytes.len(), path.display());
    Ok(())
}
