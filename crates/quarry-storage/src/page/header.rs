//! On-disk page header.
//!
//! The header is a fixed 24-byte structure at the start of every page.

use bytes::{Buf, BufMut};
use quarry_common::constants::PAGE_HEADER_SIZE;
use quarry_common::types::PageId;

use super::types::PageKind;
use super::{PageError, PageResult};

/// Page header (24 bytes).
///
/// Layout:
/// - page_id: 8 bytes
/// - next_free: 8 bytes (free-list link, `INVALID` for live pages)
/// - kind: 1 byte
/// - reserved: 7 bytes (for alignment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Number of this page within its file.
    pub page_id: PageId,
    /// Next page on the file's free list; `INVALID` terminates the list
    /// and is the value carried by every live page.
    pub next_free: PageId,
    /// What this page slot currently holds.
    pub kind: PageKind,
}

impl PageHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = PAGE_HEADER_SIZE;

    /// Creates a new header.
    pub fn new(page_id: PageId, kind: PageKind) -> Self {
        Self {
            page_id,
            next_free: PageId::INVALID,
            kind,
        }
    }

    /// Serializes the header to bytes.
    pub fn serialize(&self, buf: &mut impl BufMut) {
        buf.put_u64(self.page_id.as_u64());
        buf.put_u64(self.next_free.as_u64());
        buf.put_u8(self.kind.as_u8());
        buf.put_bytes(0, 7); // reserved
    }

    /// Deserializes a header from bytes.
    pub fn deserialize(buf: &mut impl Buf) -> PageResult<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(PageError::Truncated {
                expected: Self::SIZE,
                actual: buf.remaining(),
            });
        }

        let page_id = PageId::new(buf.get_u64());
        let next_free = PageId::new(buf.get_u64());
        let kind = PageKind::from_u8(buf.get_u8())?;
        buf.advance(7); // reserved

        Ok(Self {
            page_id,
            next_free,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let mut header = PageHeader::new(PageId::new(11), PageKind::Free);
        header.next_free = PageId::new(4);

        let mut buf = Vec::new();
        header.serialize(&mut buf);
        assert_eq!(buf.len(), PageHeader::SIZE);

        let decoded = PageHeader::deserialize(&mut &buf[..]).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_live_header_has_no_free_link() {
        let header = PageHeader::new(PageId::new(0), PageKind::Data);
        assert_eq!(header.next_free, PageId::INVALID);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = PageHeader::deserialize(&mut &[0u8; 8][..]).unwrap_err();
        assert!(matches!(err, PageError::Truncated { .. }));
    }
}
