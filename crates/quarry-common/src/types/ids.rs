//! Core identifier types for QuarryDB.
//!
//! Raw `u64`s are easy to mix up, so page numbers and file identities
//! get their own newtypes. Both reserve a sentinel for "none".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a page within a single file.
///
/// Page numbers are dense indexes assigned by the owning file; the
/// buffer pool pairs them with a [`FileId`] to name a page globally.
/// `INVALID` marks "no page" in frame descriptors and free-list links.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PageId(u64);

impl PageId {
    /// Sentinel for "no page".
    pub const INVALID: Self = Self(u64::MAX);

    /// Wraps a raw page number.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw page number.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// True unless this is the `INVALID` sentinel.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "PageId({})", self.0)
        } else {
            write!(f, "PageId(INVALID)")
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for PageId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<PageId> for u64 {
    #[inline]
    fn from(id: PageId) -> Self {
        id.as_u64()
    }
}

/// Identifies an open page file.
///
/// Handed out once per open from a process-wide counter, so two handles
/// compare equal exactly when they refer to the same open file. The
/// buffer pool keys its page directory on `(FileId, PageId)`.
///
/// ```rust
/// use quarry_common::types::FileId;
///
/// assert!(FileId::new(1).is_valid());
/// assert!(!FileId::INVALID.is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct FileId(u64);

impl FileId {
    /// Sentinel for "no file". Real identities start at [`FileId::FIRST`].
    pub const INVALID: Self = Self(0);

    /// First identity the counter hands out.
    pub const FIRST: Self = Self(1);

    /// Wraps a raw file identity.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw file identity.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// True unless this is the `INVALID` sentinel.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "FileId({})", self.0)
        } else {
            write!(f, "FileId(INVALID)")
        }
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for FileId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<FileId> for u64 {
    #[inline]
    fn from(id: FileId) -> Self {
        id.as_u64()
    }
}
