//! File handle trait.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use quarry_common::types::{FileId, PageId};

use super::error::IoResult;
use crate::page::Page;

/// Trait for page-granular file operations.
///
/// This is the interface the buffer pool consumes. The production
/// implementation is [`PageFile`](super::PageFile); tests substitute
/// in-memory files to observe I/O traffic.
///
/// All operations are synchronous and take `&self`: implementations use
/// interior mutability for their cursor and header state.
pub trait FileHandle {
    /// Returns this handle's stable identity.
    ///
    /// Two handles with equal IDs refer to the same open file; the buffer
    /// pool keys its page directory on `(FileId, PageId)`.
    fn file_id(&self) -> FileId;

    /// Returns the file path, used only for error reporting.
    fn filename(&self) -> &Path;

    /// Reads the on-disk contents of a page.
    fn read_page(&self, page_id: PageId) -> IoResult<Page>;

    /// Persists a page. The page carries its own number.
    fn write_page(&self, page: &Page) -> IoResult<()>;

    /// Allocates a fresh page with a newly assigned number.
    fn allocate_page(&self) -> IoResult<Page>;

    /// Removes a page from the file.
    fn delete_page(&self, page_id: PageId) -> IoResult<()>;
}

/// Process-wide file identity counter.
static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(FileId::FIRST.as_u64());

/// Assigns the next file identity.
pub(crate) fn next_file_id() -> FileId {
    FileId::new(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
}
