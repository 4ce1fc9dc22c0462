use std::path::{Path, PathBuf};

use crate::{CodecOptions, Result};

pub use crate::api::optimize::derive_output_path;

/// Optimizes `input` next to itself and optionally keeps the container.
pub fn optimize(
    input: &Path,
    container: Option<&Path>,
    options: CodecOptions,
) -> Result<PathBuf> {
    crate::api::optimize::prepare()
        .with_options(options)
        .with_image(input)
        .use_container(container)
        .execute()
}
