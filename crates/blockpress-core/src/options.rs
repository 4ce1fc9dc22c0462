/// Default suffix appended to the file stem of the output image.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_optimized";

/// Options for the optimize flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Appended to the input's file stem when no output path is given,
    /// `photo.png` becomes `photo_optimized.png` by default.
    pub output_suffix: String,

    /// If true the rows and columns that do not fill a whole 8×8 block are
    /// taken over from the input, so the output keeps the input dimensions.
    /// Otherwise the output is cropped to whole blocks.
    pub copy_uncovered_region: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            copy_uncovered_region: true,
        }
    }
}

impl CodecOptions {
    pub fn with_output_suffix<S: AsRef<str>>(mut self, suffix: S) -> Self {
        self.output_suffix = suffix.as_ref().to_string();
        self
    }

    pub fn with_copy_uncovered_region(mut self, copy: bool) -> Self {
        self.copy_uncovered_region = copy;
        self
    }
}
