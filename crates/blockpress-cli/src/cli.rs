use std::path::PathBuf;

use blockpress_core::options::DEFAULT_OUTPUT_SUFFIX;
use blockpress_core::CodecOptions;
use clap::Parser;

use crate::CliResult;

/// Compresses an image through the block codec and writes the reconstruction
/// next to it as `<stem><suffix>.<ext>`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Image file such as PNG, JPEG or BMP, used readonly.
    #[arg(value_name = "image file")]
    pub input: PathBuf,

    /// Also store the compressed container as file
    #[arg(short, long, value_name = "container file")]
    pub container: Option<PathBuf>,

    /// Appended to the file stem of the output image
    #[arg(
        short,
        long,
        value_name = "suffix",
        default_value = DEFAULT_OUTPUT_SUFFIX,
        allow_hyphen_values = true
    )]
    pub suffix: String,

    /// Crop the output to whole 8x8 blocks instead of keeping the input size
    #[arg(long)]
    pub crop: bool,
}

impl CliArgs {
    pub fn options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_output_suffix(&self.suffix)
            .with_copy_uncovered_region(!self.crop)
    }

    pub fn run(self) -> CliResult<PathBuf> {
        let options = self.options();
        Ok(blockpress_core::commands::optimize(
            &self.input,
            self.container.as_deref(),
            options,
        )?)
    }
}
