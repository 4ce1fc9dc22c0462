use std::fmt;

use clap::Parser;
use thiserror::Error;

use blockpress_core::CodecError;

mod cli;

use cli::CliArgs;

#[derive(Error)]
pub enum CliError {
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

pub type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let output = args.run()?;
    println!("{}", output.display());

    Ok(())
}
