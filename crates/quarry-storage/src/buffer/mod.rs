//! Buffer pool manager for QuarryDB.
//!
//! The buffer pool manages a fixed-size pool of in-memory page frames
//! sitting between access methods and the page files on disk:
//!
//! - **Page Caching**: at most one in-memory copy of any `(file, page)`
//! - **Pin/Unpin**: explicit pin counting blocks eviction of pages in use
//! - **Dirty Tracking**: modified pages are written back before reuse
//! - **Eviction Policy**: single-sweep clock replacement
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       BufferPool                          │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │                   Page Directory                      │ │
//! │  │         HashMap<(FileId, PageId), FrameId>            │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! │                            │                              │
//! │                            ▼                              │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │        Frame Table          ║        Page Pool        │ │
//! │  │  ┌────────┐  ┌────────┐     ║  ┌────────┐ ┌────────┐ │ │
//! │  │  │ desc 0 │  │ desc 1 │ ... ║  │ page 0 │ │ page 1 │ │ │
//! │  │  │ owner  │  │ owner  │     ║  │ data[] │ │ data[] │ │ │
//! │  │  │ pin    │  │ pin    │     ║  └────────┘ └────────┘ │ │
//! │  │  │ dirty  │  │ dirty  │     ║                        │ │
//! │  │  └────────┘  └────────┘     ║                        │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! │                            │                              │
//! │                            ▼                              │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │                   Clock Replacer                      │ │
//! │  │              (selects eviction victims)               │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use quarry_storage::buffer::{BufferPool, BufferPoolConfig};
//! use quarry_storage::file::{FileHandle, PageFile};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut pool = BufferPool::new(BufferPoolConfig::new(64))?;
//!     let file: Rc<dyn FileHandle> = Rc::new(PageFile::create("data.qdb")?);
//!
//!     // Create a page, write into it, release the pin as dirty.
//!     let (page_id, page) = pool.alloc_page(&file)?;
//!     page.data_mut()[..5].copy_from_slice(b"hello");
//!     pool.unpin_page(&file, page_id, true)?;
//!
//!     // Write everything of this file back to disk.
//!     pool.flush_file(&file)?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod eviction;
mod frame;
mod pool;

pub use config::BufferPoolConfig;
pub use error::{BufferError, BufferResult};
pub use eviction::ClockReplacer;
pub use frame::{FrameDesc, FrameId};
pub use pool::BufferPool;

/// Statistics for buffer pool monitoring.
#[derive(Debug, Clone, Default)]
pub struct BufferPoolStats {
    /// Total number of page fetches.
    pub fetches: u64,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (required disk read).
    pub misses: u64,
    /// Number of pages evicted.
    pub evictions: u64,
    /// Number of dirty pages written back.
    pub flushes: u64,
    /// Current number of pinned frames.
    pub pinned_frames: usize,
    /// Current number of dirty frames.
    pub dirty_frames: usize,
}

impl BufferPoolStats {
    /// Returns the cache hit ratio (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        if self.fetches == 0 {
            0.0
        } else {
            self.hits as f64 / self.fetches as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_hit_ratio() {
        let mut stats = BufferPoolStats::default();
        assert_eq!(stats.hit_ratio(), 0.0);

        stats.fetches = 100;
        stats.hits = 80;
        assert!((stats.hit_ratio() - 0.8).abs() < f64::EPSILON);
    }
}
