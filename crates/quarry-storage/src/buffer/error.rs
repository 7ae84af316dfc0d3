//! Buffer pool errors.

use quarry_common::types::PageId;
use thiserror::Error;

use super::frame::FrameId;
use crate::file::IoError;

/// Result type for buffer pool operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer pool operations.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Fields are documented by variant docs
pub enum BufferError {
    /// Every frame is pinned; no victim can be chosen.
    #[error("buffer pool exceeded: all frames are pinned")]
    BufferExceeded,

    /// Unpin of a resident page whose pin count is already zero.
    #[error("page {page_id} of file {file} (frame {frame_id}) is not pinned")]
    PageNotPinned {
        file: String,
        page_id: PageId,
        frame_id: FrameId,
    },

    /// Flush encountered a pinned page of the target file.
    #[error("page {page_id} of file {file} (frame {frame_id}) is pinned")]
    PagePinned {
        file: String,
        page_id: PageId,
        frame_id: FrameId,
    },

    /// A frame is marked valid but its metadata is nonsense.
    #[error(
        "frame {frame_id} is in a bad state \
         (valid={valid}, dirty={dirty}, ref_bit={ref_bit})"
    )]
    BadBuffer {
        frame_id: FrameId,
        dirty: bool,
        valid: bool,
        ref_bit: bool,
    },

    /// I/O failure from the owning file, surfaced unchanged.
    #[error("file I/O error: {0}")]
    Io(#[from] IoError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl BufferError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a `PageNotPinned` error for a frame.
    pub fn not_pinned(file: impl Into<String>, page_id: PageId, frame_id: FrameId) -> Self {
        Self::PageNotPinned {
            file: file.into(),
            page_id,
            frame_id,
        }
    }

    /// Creates a `PagePinned` error for a frame.
    pub fn pinned(file: impl Into<String>, page_id: PageId, frame_id: FrameId) -> Self {
        Self::PagePinned {
            file: file.into(),
            page_id,
            frame_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BufferError::not_pinned("data.qdb", PageId::new(4), FrameId::new(2));
        assert!(matches!(
            err,
            BufferError::PageNotPinned {
                page_id,
                frame_id: FrameId(2),
                ..
            } if page_id == PageId::new(4)
        ));
    }

    #[test]
    fn test_error_display() {
        let err = BufferError::pinned("data.qdb", PageId::new(1), FrameId::new(0));
        let msg = err.to_string();
        assert!(msg.contains("data.qdb"));
        assert!(msg.contains("pinned"));
    }
}
