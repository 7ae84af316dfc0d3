//! Buffer frame descriptor - bookkeeping for one slot in the page pool.

use std::fmt;
use std::rc::Rc;

use quarry_common::types::{FileId, PageId};

use crate::file::FileHandle;

/// Frame identifier - index into the buffer pool's frame array.
///
/// Frames are identified by position, never by pointer; all
/// cross-component references use these small indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

impl FrameId {
    /// Creates a new frame ID.
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for FrameId {
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<FrameId> for usize {
    fn from(id: FrameId) -> Self {
        id.0
    }
}

/// Per-frame metadata: owner, pin count, dirty and reference bits.
///
/// A descriptor is either *empty* (`!valid`, no owner, `INVALID` page) or
/// *occupied* (`valid`, an owning file and live page number). It moves
/// between the two states only through [`set`](FrameDesc::set) and
/// [`clear`](FrameDesc::clear).
pub struct FrameDesc {
    /// Frame ID (index in the frame array), fixed at construction.
    frame_id: FrameId,
    /// Owning file, `None` when the frame is empty.
    file: Option<Rc<dyn FileHandle>>,
    /// Page held by this frame, `INVALID` when empty.
    page_id: PageId,
    /// Number of outstanding pins.
    pin_count: u32,
    /// Whether the page was modified since load.
    dirty: bool,
    /// Whether this frame holds a live page.
    valid: bool,
    /// Clock reference bit: set on access, cleared by the sweep.
    ref_bit: bool,
}

impl FrameDesc {
    /// Creates a new empty frame descriptor.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            file: None,
            page_id: PageId::INVALID,
            pin_count: 0,
            dirty: false,
            valid: false,
            ref_bit: false,
        }
    }

    /// Returns the frame ID.
    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    /// Returns the owning file handle, if occupied.
    #[inline]
    pub fn file(&self) -> Option<&Rc<dyn FileHandle>> {
        self.file.as_ref()
    }

    /// Returns the owning file's identity, if occupied.
    #[inline]
    pub fn owner_id(&self) -> Option<FileId> {
        self.file.as_ref().map(|f| f.file_id())
    }

    /// Returns the page held by this frame.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Returns the current pin count.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    /// Returns true if the frame is pinned.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    /// Returns true if the frame is dirty.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sets or clears the dirty bit.
    #[inline]
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Returns true if this frame holds a live page.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the reference bit.
    #[inline]
    pub fn ref_bit(&self) -> bool {
        self.ref_bit
    }

    /// Clears the reference bit. Only the clock sweep does this.
    #[inline]
    pub fn clear_ref_bit(&mut self) {
        self.ref_bit = false;
    }

    /// Adds a pin and marks the frame recently used.
    #[inline]
    pub fn pin(&mut self) {
        self.pin_count += 1;
        self.ref_bit = true;
    }

    /// Releases one pin. The caller checks for underflow first.
    #[inline]
    pub fn unpin(&mut self) {
        debug_assert!(self.pin_count > 0, "unpinned frame with pin_count = 0");
        self.pin_count -= 1;
    }

    /// Occupies the frame with a freshly loaded page: one pin, clean,
    /// recently used.
    pub fn set(&mut self, file: Rc<dyn FileHandle>, page_id: PageId) {
        self.file = Some(file);
        self.page_id = page_id;
        self.pin_count = 1;
        self.dirty = false;
        self.valid = true;
        self.ref_bit = true;
    }

    /// Resets the frame to empty. `frame_id` is preserved.
    pub fn clear(&mut self) {
        self.file = None;
        self.page_id = PageId::INVALID;
        self.pin_count = 0;
        self.dirty = false;
        self.valid = false;
        self.ref_bit = false;
    }
}

impl fmt::Debug for FrameDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameDesc")
            .field("frame_id", &self.frame_id)
            .field("file", &self.owner_id())
            .field("page_id", &self.page_id)
            .field("pin_count", &self.pin_count)
            .field("dirty", &self.dirty)
            .field("valid", &self.valid)
            .field("ref_bit", &self.ref_bit)
            .finish()
    }
}
