//! Page-structured file backed by `std::fs`.
//!
//! Layout: a header block at offset 0, then `PAGE_SIZE` slots. Deleted
//! pages are threaded into a free list through their page headers and are
//! recycled by [`allocate_page`](FileHandle::allocate_page) before the
//! file is extended.

use std::fs::{File as StdFile, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut};
use parking_lot::Mutex;
use quarry_common::constants::{FILE_FORMAT_VERSION, FILE_HEADER_SIZE, FILE_MAGIC};
use quarry_common::types::{FileId, PageId};

use super::error::{IoError, IoResult};
use super::handle::{next_file_id, FileHandle};
use crate::page::{Page, PageKind, PAGE_SIZE};

/// File header persisted at offset 0.
///
/// Layout:
/// - magic: 4 bytes
/// - version: 4 bytes
/// - page_count: 8 bytes (slots ever allocated, live or free)
/// - first_free: 8 bytes (head of the deleted-page list)
/// - reserved: 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileHeader {
    page_count: u64,
    first_free: PageId,
}

impl FileHeader {
    fn new() -> Self {
        Self {
            page_count: 0,
            first_free: PageId::INVALID,
        }
    }

    fn serialize(&self, buf: &mut impl BufMut) {
        buf.put_u32(FILE_MAGIC);
        buf.put_u32(FILE_FORMAT_VERSION);
        buf.put_u64(self.page_count);
        buf.put_u64(self.first_free.as_u64());
        buf.put_bytes(0, 8); // reserved
    }

    fn deserialize(buf: &mut impl Buf, path: &Path) -> IoResult<Self> {
        if buf.remaining() < FILE_HEADER_SIZE {
            return Err(IoError::BadMagic {
                path: path.to_path_buf(),
            });
        }
        let magic = buf.get_u32();
        if magic != FILE_MAGIC {
            return Err(IoError::BadMagic {
                path: path.to_path_buf(),
            });
        }
        let version = buf.get_u32();
        if version != FILE_FORMAT_VERSION {
            return Err(IoError::UnsupportedVersion { found: version });
        }
        let page_count = buf.get_u64();
        let first_free = PageId::new(buf.get_u64());
        buf.advance(8); // reserved
        Ok(Self {
            page_count,
            first_free,
        })
    }
}

/// Byte offset of a page slot. The header occupies the first
/// page-sized block so that slots stay page-aligned.
fn page_offset(page_id: PageId) -> u64 {
    (PAGE_SIZE as u64) * (1 + page_id.as_u64())
}

struct FileInner {
    file: StdFile,
    header: FileHeader,
}

impl FileInner {
    fn read_block(&mut self, offset: u64, len: usize) -> IoResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn write_block(&mut self, offset: u64, bytes: &[u8]) -> IoResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        Ok(())
    }

    fn write_header(&mut self) -> IoResult<()> {
        let mut buf = Vec::with_capacity(FILE_HEADER_SIZE);
        self.header.serialize(&mut buf);
        self.write_block(0, &buf)
    }

    fn read_slot(&mut self, page_id: PageId) -> IoResult<Page> {
        let bytes = self.read_block(page_offset(page_id), PAGE_SIZE)?;
        Ok(Page::from_bytes(&bytes)?)
    }

    fn write_slot(&mut self, page: &Page) -> IoResult<()> {
        self.write_block(page_offset(page.page_id()), &page.to_bytes())
    }

    fn check_bounds(&self, page_id: PageId) -> IoResult<()> {
        if !page_id.is_valid() || page_id.as_u64() >= self.header.page_count {
            return Err(IoError::PageOutOfBounds {
                page_id,
                page_count: self.header.page_count,
            });
        }
        Ok(())
    }
}

/// A page-structured database file.
///
/// All methods take `&self`; the file cursor and in-memory header are
/// behind a single mutex.
pub struct PageFile {
    file_id: FileId,
    path: PathBuf,
    inner: Mutex<FileInner>,
}

impl PageFile {
    /// Creates a new page file, failing if the path already exists.
    pub fn create(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| IoError::from_io_with_path(e, path))?;

        let mut inner = FileInner {
            file,
            header: FileHeader::new(),
        };
        inner.write_header()?;
        inner.file.sync_all()?;

        Ok(Self {
            file_id: next_file_id(),
            path: path.to_path_buf(),
            inner: Mutex::new(inner),
        })
    }

    /// Opens an existing page file.
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| IoError::from_io_with_path(e, path))?;

        let mut inner = FileInner {
            file,
            header: FileHeader::new(),
        };
        let block = inner.read_block(0, FILE_HEADER_SIZE)?;
        inner.header = FileHeader::deserialize(&mut &block[..], path)?;

        Ok(Self {
            file_id: next_file_id(),
            path: path.to_path_buf(),
            inner: Mutex::new(inner),
        })
    }

    /// Returns the number of page slots in the file (live or free).
    pub fn num_pages(&self) -> u64 {
        self.inner.lock().header.page_count
    }

    /// Syncs file contents and metadata to disk.
    pub fn sync(&self) -> IoResult<()> {
        self.inner.lock().file.sync_all()?;
        Ok(())
    }
}

impl FileHandle for PageFile {
    fn file_id(&self) -> FileId {
        self.file_id
    }

    fn filename(&self) -> &Path {
        &self.path
    }

    fn read_page(&self, page_id: PageId) -> IoResult<Page> {
        let mut inner = self.inner.lock();
        inner.check_bounds(page_id)?;
        let page = inner.read_slot(page_id)?;
        if page.header().kind == PageKind::Free {
            return Err(IoError::PageNotAllocated { page_id });
        }
        Ok(page)
    }

    fn write_page(&self, page: &Page) -> IoResult<()> {
        let mut inner = self.inner.lock();
        inner.check_bounds(page.page_id())?;
        inner.write_slot(page)
    }

    fn allocate_page(&self) -> IoResult<Page> {
        let mut inner = self.inner.lock();
        let page_id = if inner.header.first_free.is_valid() {
            // Pop the free list before extending the file.
            let slot_id = inner.header.first_free;
            let slot = inner.read_slot(slot_id)?;
            if slot.header().kind != PageKind::Free {
                return Err(IoError::FreeListCorrupt { page_id: slot_id });
            }
            inner.header.first_free = slot.header().next_free;
            slot_id
        } else {
            let id = PageId::new(inner.header.page_count);
            inner.header.page_count += 1;
            id
        };

        let page = Page::new(page_id);
        inner.write_slot(&page)?;
        inner.write_header()?;
        Ok(page)
    }

    fn delete_page(&self, page_id: PageId) -> IoResult<()> {
        let mut inner = self.inner.lock();
        inner.check_bounds(page_id)?;
        let slot = inner.read_slot(page_id)?;
        if slot.header().kind == PageKind::Free {
            // Deleting twice is a no-op.
            return Ok(());
        }
        let marker = Page::free(page_id, inner.header.first_free);
        inner.write_slot(&marker)?;
        inner.header.first_free = page_id;
        inner.write_header()
    }
}

impl std::fmt::Debug for PageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFile")
            .field("file_id", &self.file_id)
            .field("path", &self.path)
            .field("num_pages", &self.num_pages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.qdb");

        {
            let file = PageFile::create(&path).unwrap();
            assert_eq!(file.num_pages(), 0);
        }

        let file = PageFile::open(&path).unwrap();
        assert_eq!(file.num_pages(), 0);
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.qdb");

        let _file = PageFile::create(&path).unwrap();
        let err = PageFile::create(&path).unwrap_err();
        assert!(matches!(err, IoError::AlreadyExists { .. }));
    }

    #[test]
    fn test_open_missing_fails() {
        let dir = tempdir().unwrap();
        let err = PageFile::open(dir.path().join("missing.qdb")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_open_garbage_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.qdb");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let err = PageFile::open(&path).unwrap_err();
        assert!(matches!(err, IoError::BadMagic { .. }));
    }

    #[test]
    fn test_allocate_assigns_sequential_ids() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        assert_eq!(file.allocate_page().unwrap().page_id(), PageId::new(0));
        assert_eq!(file.allocate_page().unwrap().page_id(), PageId::new(1));
        assert_eq!(file.num_pages(), 2);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.qdb");
        let page_id;

        {
            let file = PageFile::create(&path).unwrap();
            let mut page = file.allocate_page().unwrap();
            page_id = page.page_id();
            page.data_mut()[..5].copy_from_slice(b"hello");
            file.write_page(&page).unwrap();
            file.sync().unwrap();
        }

        let file = PageFile::open(&path).unwrap();
        let page = file.read_page(page_id).unwrap();
        assert_eq!(&page.data()[..5], b"hello");
    }

    #[test]
    fn test_read_out_of_bounds() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        let err = file.read_page(PageId::new(0)).unwrap_err();
        assert!(matches!(err, IoError::PageOutOfBounds { .. }));

        let err = file.read_page(PageId::INVALID).unwrap_err();
        assert!(matches!(err, IoError::PageOutOfBounds { .. }));
    }

    #[test]
    fn test_delete_then_read_fails() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        let page = file.allocate_page().unwrap();
        file.delete_page(page.page_id()).unwrap();

        let err = file.read_page(page.page_id()).unwrap_err();
        assert!(matches!(err, IoError::PageNotAllocated { .. }));
    }

    #[test]
    fn test_delete_twice_is_noop() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        let page = file.allocate_page().unwrap();
        file.delete_page(page.page_id()).unwrap();
        file.delete_page(page.page_id()).unwrap();
    }

    #[test]
    fn test_allocate_reuses_deleted_pages() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        let p0 = file.allocate_page().unwrap().page_id();
        let p1 = file.allocate_page().unwrap().page_id();
        file.delete_page(p0).unwrap();
        file.delete_page(p1).unwrap();

        // Most recently deleted comes back first; the file does not grow.
        assert_eq!(file.allocate_page().unwrap().page_id(), p1);
        assert_eq!(file.allocate_page().unwrap().page_id(), p0);
        assert_eq!(file.num_pages(), 2);
    }

    #[test]
    fn test_reallocated_page_is_zeroed() {
        let dir = tempdir().unwrap();
        let file = PageFile::create(dir.path().join("t.qdb")).unwrap();

        let mut page = file.allocate_page().unwrap();
        page.data_mut().fill(0xab);
        file.write_page(&page).unwrap();
        file.delete_page(page.page_id()).unwrap();

        let fresh = file.allocate_page().unwrap();
        assert_eq!(fresh.page_id(), page.page_id());
        assert!(fresh.data().iter().all(|&b| b == 0));
    }
}
