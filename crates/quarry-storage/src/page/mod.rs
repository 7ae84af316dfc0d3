//! Page layout and disk format for QuarryDB.
//!
//! All data is organized into fixed-size pages (default 8KB). A page
//! carries a small header with its own number, so a page image is
//! self-describing when handed to the file layer for write-back.
//!
//! # Page Format
//!
//! ```text
//! +------------------+
//! |   Page Header    |  24 bytes (page_id, next_free, kind)
//! +------------------+
//! |                  |
//! |   Page Data      |  PAGE_SIZE - 24 bytes, opaque to this layer
//! |                  |
//! +------------------+
//! ```
//!
//! `next_free` threads deleted pages into the owning file's free list and
//! is meaningless for live pages.

mod header;
mod types;

pub use header::PageHeader;
pub use types::PageKind;

use bytes::BufMut;
use quarry_common::types::PageId;
use thiserror::Error;

/// Default page size (8 KB).
pub const PAGE_SIZE: usize = quarry_common::constants::DEFAULT_PAGE_SIZE;

/// Size of the page header in bytes.
pub const PAGE_HEADER_SIZE: usize = quarry_common::constants::PAGE_HEADER_SIZE;

/// Usable data bytes per page.
pub const PAGE_DATA_SIZE: usize = PAGE_SIZE - PAGE_HEADER_SIZE;

/// Result type for page codec operations.
pub type PageResult<T> = Result<T, PageError>;

/// Errors produced when decoding a page image.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Fields are documented by variant docs
pub enum PageError {
    /// Page image shorter than a full page.
    #[error("truncated page image: {actual} bytes, expected {expected}")]
    Truncated { expected: usize, actual: usize },

    /// Unknown page kind byte.
    #[error("invalid page kind: {0:#04x}")]
    InvalidKind(u8),
}

/// A fixed-size page: header plus raw data.
///
/// The buffer pool's page pool is a flat array of these; access methods
/// interpret the data region.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    header: PageHeader,
    data: Vec<u8>,
}

impl Page {
    /// Creates a zeroed live page with the given number.
    pub fn new(page_id: PageId) -> Self {
        Self {
            header: PageHeader::new(page_id, PageKind::Data),
            data: vec![0u8; PAGE_DATA_SIZE],
        }
    }

    /// Creates a free-list marker page linking to `next_free`.
    pub fn free(page_id: PageId, next_free: PageId) -> Self {
        let mut header = PageHeader::new(page_id, PageKind::Free);
        header.next_free = next_free;
        Self {
            header,
            data: vec![0u8; PAGE_DATA_SIZE],
        }
    }

    /// Returns this page's number.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.header.page_id
    }

    /// Returns the page header.
    #[inline]
    pub fn header(&self) -> &PageHeader {
        &self.header
    }

    /// Returns the page data region.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the page data region mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Serializes the page to a full `PAGE_SIZE` image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PAGE_SIZE);
        self.header.serialize(&mut buf);
        buf.put_slice(&self.data);
        buf
    }

    /// Deserializes a page from a full `PAGE_SIZE` image.
    pub fn from_bytes(bytes: &[u8]) -> PageResult<Self> {
        if bytes.len() < PAGE_SIZE {
            return Err(PageError::Truncated {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }
        let header = PageHeader::deserialize(&mut &bytes[..PAGE_HEADER_SIZE])?;
        let data = bytes[PAGE_HEADER_SIZE..PAGE_SIZE].to_vec();
        Ok(Self { header, data })
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("page_id", &self.header.page_id)
            .field("kind", &self.header.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_geometry() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert_eq!(PAGE_HEADER_SIZE + PAGE_DATA_SIZE, PAGE_SIZE);
    }

    #[test]
    fn test_new_page_is_zeroed() {
        let page = Page::new(PageId::new(3));
        assert_eq!(page.page_id(), PageId::new(3));
        assert_eq!(page.header().kind, PageKind::Data);
        assert!(page.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_page_image_roundtrip() {
        let mut page = Page::new(PageId::new(7));
        page.data_mut()[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let bytes = page.to_bytes();
        assert_eq!(bytes.len(), PAGE_SIZE);

        let decoded = Page::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_truncated_image_rejected() {
        let err = Page::from_bytes(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, PageError::Truncated { actual: 16, .. }));
    }

    #[test]
    fn test_free_marker() {
        let page = Page::free(PageId::new(5), PageId::new(2));
        assert_eq!(page.header().kind, PageKind::Free);
        assert_eq!(page.header().next_free, PageId::new(2));
    }
}
