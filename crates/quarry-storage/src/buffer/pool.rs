//! Buffer pool implementation.
//!
//! The buffer pool keeps a fixed-size cache of pages in memory, handing
//! out pinned page images and choosing eviction victims with the clock
//! replacer when a frame is needed.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use quarry_common::types::{FileId, PageId};
use tracing::{debug, error, warn};

use super::config::BufferPoolConfig;
use super::error::{BufferError, BufferResult};
use super::eviction::ClockReplacer;
use super::frame::{FrameDesc, FrameId};
use super::BufferPoolStats;
use crate::file::FileHandle;
use crate::page::Page;

/// The buffer pool manager.
///
/// All operations are synchronous and run under external serialization;
/// the pool provides no internal locking. A page image returned by
/// [`read_page`](BufferPool::read_page) or
/// [`alloc_page`](BufferPool::alloc_page) stays resident until its pins
/// are released; pin counts are the sole eviction barrier.
pub struct BufferPool {
    /// Configuration.
    config: BufferPoolConfig,
    /// Frame table: per-frame metadata.
    frames: Vec<FrameDesc>,
    /// Page pool, parallel to the frame table.
    pool: Vec<Page>,
    /// Page directory: maps (file, page) -> frame.
    directory: HashMap<(FileId, PageId), FrameId>,
    /// Clock replacer for eviction.
    replacer: ClockReplacer,
    /// Fetch counter for statistics.
    fetches: u64,
    /// Hit counter for statistics.
    hits: u64,
    /// Miss counter for statistics.
    misses: u64,
    /// Eviction counter for statistics.
    evictions: u64,
    /// Write-back counter for statistics.
    flushes: u64,
}

impl BufferPool {
    /// Creates a new buffer pool with the given configuration.
    pub fn new(config: BufferPoolConfig) -> BufferResult<Self> {
        config.validate().map_err(BufferError::config)?;

        let num_frames = config.num_frames;
        let frames = (0..num_frames)
            .map(|i| FrameDesc::new(FrameId::new(i)))
            .collect();
        let pool = (0..num_frames).map(|_| Page::new(PageId::INVALID)).collect();
        let directory = HashMap::with_capacity(config.directory_capacity());

        Ok(Self {
            config,
            frames,
            pool,
            directory,
            replacer: ClockReplacer::new(num_frames),
            fetches: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            flushes: 0,
        })
    }

    /// Fetches a page, pinning it.
    ///
    /// A resident page is returned directly; otherwise a frame is claimed
    /// and the page is read from the file. Every successful call must be
    /// balanced by one [`unpin_page`](BufferPool::unpin_page).
    pub fn read_page(
        &mut self,
        file: &Rc<dyn FileHandle>,
        page_id: PageId,
    ) -> BufferResult<&mut Page> {
        self.fetches += 1;
        let key = (file.file_id(), page_id);

        if let Some(&frame_id) = self.directory.get(&key) {
            self.hits += 1;
            self.frames[frame_id.index()].pin();
            return Ok(&mut self.pool[frame_id.index()]);
        }

        self.misses += 1;
        let frame_id = self.alloc_buf()?;
        let idx = frame_id.index();

        // Load before publishing: a failed read leaves the frame empty
        // and the directory untouched.
        let page = file.read_page(page_id)?;
        debug!(file = %file.filename().display(), page = %page_id, frame = %frame_id, "page loaded");
        self.pool[idx] = page;
        self.directory.insert(key, frame_id);
        self.frames[idx].set(Rc::clone(file), page_id);
        Ok(&mut self.pool[idx])
    }

    /// Creates a new page in the file and installs it, pinned.
    ///
    /// Returns the assigned page number and the page image.
    pub fn alloc_page(
        &mut self,
        file: &Rc<dyn FileHandle>,
    ) -> BufferResult<(PageId, &mut Page)> {
        // The file assigns the page number before a frame is claimed.
        let page = file.allocate_page()?;
        let page_id = page.page_id();

        let frame_id = self.alloc_buf()?;
        let idx = frame_id.index();

        self.pool[idx] = page;
        self.directory.insert((file.file_id(), page_id), frame_id);
        self.frames[idx].set(Rc::clone(file), page_id);
        Ok((page_id, &mut self.pool[idx]))
    }

    /// Releases one pin on a page, optionally marking it dirty.
    ///
    /// Unpinning a page that is not resident is a no-op: callers cannot
    /// always tell whether a page has been evicted since they last held
    /// it. The dirty bit is sticky; only a write-back clears it.
    pub fn unpin_page(
        &mut self,
        file: &Rc<dyn FileHandle>,
        page_id: PageId,
        dirty: bool,
    ) -> BufferResult<()> {
        let key = (file.file_id(), page_id);
        let Some(&frame_id) = self.directory.get(&key) else {
            return Ok(());
        };

        let frame = &mut self.frames[frame_id.index()];
        if dirty {
            frame.set_dirty(true);
        }
        if frame.pin_count() == 0 {
            return Err(BufferError::not_pinned(
                file.filename().display().to_string(),
                page_id,
                frame_id,
            ));
        }
        frame.unpin();
        Ok(())
    }

    /// Writes back and evicts every resident page of `file`.
    ///
    /// Fails with [`PagePinned`](BufferError::PagePinned) on the first
    /// pinned page encountered; frames of the same file already scanned
    /// have been evicted by then. Callers must unpin everything first.
    pub fn flush_file(&mut self, file: &Rc<dyn FileHandle>) -> BufferResult<()> {
        let file_id = file.file_id();

        for idx in 0..self.frames.len() {
            if self.frames[idx].owner_id() != Some(file_id) {
                continue;
            }
            let frame_id = FrameId::new(idx);
            let page_id = self.frames[idx].page_id();

            if self.frames[idx].is_pinned() {
                return Err(BufferError::pinned(
                    file.filename().display().to_string(),
                    page_id,
                    frame_id,
                ));
            }
            if !page_id.is_valid() {
                let frame = &self.frames[idx];
                return Err(BufferError::BadBuffer {
                    frame_id,
                    dirty: frame.is_dirty(),
                    valid: frame.is_valid(),
                    ref_bit: frame.ref_bit(),
                });
            }

            if self.frames[idx].is_dirty() {
                file.write_page(&self.pool[idx])?;
                self.frames[idx].set_dirty(false);
                self.flushes += 1;
            }
            self.directory.remove(&(file_id, page_id));
            self.frames[idx].clear();
        }
        Ok(())
    }

    /// Drops a page from the pool (if resident) and deletes it from the
    /// file.
    ///
    /// The page is being destroyed, so a resident copy is discarded
    /// without write-back. Disposing a non-resident page is legal and
    /// still deletes it from the file.
    pub fn dispose_page(
        &mut self,
        file: &Rc<dyn FileHandle>,
        page_id: PageId,
    ) -> BufferResult<()> {
        let key = (file.file_id(), page_id);
        if let Some(frame_id) = self.directory.remove(&key) {
            self.frames[frame_id.index()].clear();
        }
        file.delete_page(page_id)?;
        Ok(())
    }

    /// Returns true if `(file, page_id)` is resident.
    pub fn contains(&self, file: &Rc<dyn FileHandle>, page_id: PageId) -> bool {
        self.directory.contains_key(&(file.file_id(), page_id))
    }

    /// Returns the number of frames in the buffer pool.
    pub fn num_frames(&self) -> usize {
        self.config.num_frames
    }

    /// Returns statistics about the buffer pool.
    pub fn stats(&self) -> BufferPoolStats {
        let mut pinned = 0;
        let mut dirty = 0;
        for frame in &self.frames {
            if frame.is_pinned() {
                pinned += 1;
            }
            if frame.is_dirty() {
                dirty += 1;
            }
        }

        BufferPoolStats {
            fetches: self.fetches,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            flushes: self.flushes,
            pinned_frames: pinned,
            dirty_frames: dirty,
        }
    }

    /// Dumps the frame table to stdout.
    pub fn print_self(&self) {
        println!("{self}");
    }

    // -------------------------------------------------------------------------
    // Private helpers
    // -------------------------------------------------------------------------

    /// Claims a frame for a new page, evicting a victim if necessary.
    ///
    /// The returned frame is empty and unmapped.
    fn alloc_buf(&mut self) -> BufferResult<FrameId> {
        let frame_id = self.replacer.find_victim(&mut self.frames)?;
        if self.frames[frame_id.index()].is_valid() {
            self.evict(frame_id)?;
        }
        Ok(frame_id)
    }

    /// Evicts the occupied frame chosen by the replacer: write-back if
    /// dirty, then directory removal, then descriptor reset, in that
    /// order.
    fn evict(&mut self, frame_id: FrameId) -> BufferResult<()> {
        let idx = frame_id.index();
        let page_id = self.frames[idx].page_id();
        let file = match self.frames[idx].file() {
            Some(file) => Rc::clone(file),
            // A valid frame always carries its owner.
            None => {
                let frame = &self.frames[idx];
                return Err(BufferError::BadBuffer {
                    frame_id,
                    dirty: frame.is_dirty(),
                    valid: frame.is_valid(),
                    ref_bit: frame.ref_bit(),
                });
            }
        };

        if self.frames[idx].is_dirty() {
            debug!(file = %file.filename().display(), page = %page_id, frame = %frame_id, "writing back dirty victim");
            file.write_page(&self.pool[idx])?;
            self.frames[idx].set_dirty(false);
            self.flushes += 1;
        }

        self.directory.remove(&(file.file_id(), page_id));
        self.frames[idx].clear();
        self.evictions += 1;
        Ok(())
    }
}

impl Drop for BufferPool {
    /// Writes back every dirty resident page.
    ///
    /// Shutdown always makes progress: pinned pages and write failures
    /// are logged, never raised.
    fn drop(&mut self) {
        for idx in 0..self.frames.len() {
            let frame = &self.frames[idx];
            if !frame.is_valid() {
                continue;
            }
            if frame.is_pinned() {
                warn!(
                    page = %frame.page_id(),
                    frame = %frame.frame_id(),
                    pins = frame.pin_count(),
                    "page still pinned at shutdown"
                );
            }
            if frame.is_dirty() {
                if let Some(file) = frame.file() {
                    if let Err(err) = file.write_page(&self.pool[idx]) {
                        error!(
                            file = %file.filename().display(),
                            page = %frame.page_id(),
                            %err,
                            "failed to write back dirty page at shutdown"
                        );
                    }
                }
            }
        }
    }
}

impl fmt::Display for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "buffer pool: {} frames, clock hand at {}",
            self.config.num_frames,
            self.replacer.hand_position()
        )?;
        let mut valid_frames = 0;
        for frame in &self.frames {
            if frame.is_valid() {
                valid_frames += 1;
            }
            writeln!(f, "  {frame:?}")?;
        }
        write!(f, "  total valid frames: {valid_frames}")
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("num_frames", &self.config.num_frames)
            .field("pages_cached", &self.directory.len())
            .field("stats", &self.stats())
            .finish()
    }
}
