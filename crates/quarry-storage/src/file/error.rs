//! I/O error types for the file module.

use std::io;
use std::path::PathBuf;

use quarry_common::types::PageId;
use thiserror::Error;

use crate::page::PageError;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during page file operations.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Fields are documented by variant docs
pub enum IoError {
    /// Standard I/O error.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// File already exists.
    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Not a QuarryDB page file.
    #[error("bad magic in {path}: not a page file")]
    BadMagic { path: PathBuf },

    /// Page file written by an incompatible version.
    #[error("unsupported page file version: {found}")]
    UnsupportedVersion { found: u32 },

    /// Page number past the end of the file.
    #[error("page {page_id} out of bounds: file has {page_count} pages")]
    PageOutOfBounds { page_id: PageId, page_count: u64 },

    /// Page slot exists but holds no live page.
    #[error("page {page_id} is not allocated")]
    PageNotAllocated { page_id: PageId },

    /// Free list points at a slot that is not a free page.
    #[error("free list corrupt: page {page_id} is not free")]
    FreeListCorrupt { page_id: PageId },

    /// Page image failed to decode.
    #[error("page codec error: {0}")]
    Page(#[from] PageError),
}

impl IoError {
    /// Creates a new NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a new AlreadyExists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Io { source } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Converts from std::io::Error with path context.
    pub fn from_io_with_path(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { source: err },
        }
    }
}
