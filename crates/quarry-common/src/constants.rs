//! System-wide constants for QuarryDB.
//!
//! This module defines the page geometry and buffer pool defaults used
//! across the storage layer.

// =============================================================================
// Page Constants
// =============================================================================

/// Default page size in bytes (8 KB).
///
/// This is a common page size that balances I/O efficiency with memory usage.
/// It matches the typical SSD block size and OS page size.
pub const DEFAULT_PAGE_SIZE: usize = 8 * 1024;

/// Page header size in bytes.
///
/// The header contains: page_id (8), next_free (8), kind (1),
/// reserved (7) = 24 bytes.
pub const PAGE_HEADER_SIZE: usize = 24;

// =============================================================================
// File Constants
// =============================================================================

/// Magic bytes identifying a QuarryDB page file ("QRY1").
pub const FILE_MAGIC: u32 = 0x5152_5931;

/// Page file format version.
pub const FILE_FORMAT_VERSION: u32 = 1;

/// File header size in bytes.
///
/// The header contains: magic (4), version (4), page_count (8),
/// first_free (8), reserved (8) = 32 bytes. The header occupies a full
/// page-sized block at the start of the file so that data pages stay
/// page-aligned.
pub const FILE_HEADER_SIZE: usize = 32;

// =============================================================================
// Buffer Pool Constants
// =============================================================================

/// Default number of frames in the buffer pool.
pub const DEFAULT_BUFFER_POOL_FRAMES: usize = 1024;

/// Directory load factor numerator / denominator (the page directory is
/// sized at ~1.2x the frame count).
pub const DIRECTORY_LOAD_NUM: usize = 12;

/// See [`DIRECTORY_LOAD_NUM`].
pub const DIRECTORY_LOAD_DEN: usize = 10;
