//! # quarry-common
//!
//! Common types and constants for QuarryDB.
//!
//! This crate provides the foundational types shared across the QuarryDB
//! storage layer:
//!
//! - **Types**: Core identifiers (`PageId`, `FileId`, frame indices)
//! - **Constants**: Page geometry and buffer pool defaults
//!
//! ## Example
//!
//! ```rust
//! use quarry_common::types::{FileId, PageId};
//!
//! let page_id = PageId::new(42);
//! let file_id = FileId::new(1);
//! assert!(page_id.is_valid());
//! assert!(file_id.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use types::{FileId, PageId};
