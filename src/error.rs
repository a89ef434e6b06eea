use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Setup errors that abort a whole run
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config directory {} is not readable: {source}", .path.display())]
    ConfigDir { path: PathBuf, source: io::Error },
    #[error("No .toml config files found in {}", .0.display())]
    NoConfigFiles(PathBuf),
    #[error("Output directory {} could not be created: {source}", .path.display())]
    OutputRoot { path: PathBuf, source: io::Error },
}
