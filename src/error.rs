//! Error types for lddsym

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for an analysis run
#[derive(Error, Debug)]
pub enum LddError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("ELF error: {0}")]
    Elf(#[from] ElfError),

    #[error("all symbol types disabled")]
    NoSymbolTypes,
}

/// Errors from root-confined path resolution
#[derive(Error, Debug)]
pub enum PathError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("non-existent path: {}", .0.display())]
    NotFound(PathBuf),

    #[error("symlinks too deep at {}", .0.display())]
    TooManySymlinks(PathBuf),
}

/// Errors from ELF inspection
#[derive(Error, Debug)]
pub enum ElfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid ELF file: {0}")]
    Parse(#[from] object::read::Error),

    #[error("unsupported ELF class: {0}")]
    UnsupportedClass(u8),
}
