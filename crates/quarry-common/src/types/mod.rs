//! Type definitions for QuarryDB.
//!
//! This module contains the core identifier types used across the storage
//! layer.

mod ids;

pub use ids::{FileId, PageId};
