//! Buffer pool configuration.

use quarry_common::constants::{
    DEFAULT_BUFFER_POOL_FRAMES, DEFAULT_PAGE_SIZE, DIRECTORY_LOAD_DEN, DIRECTORY_LOAD_NUM,
};

/// Configuration for the buffer pool.
#[derive(Debug, Clone)]
pub struct BufferPoolConfig {
    /// Number of page frames in the buffer pool.
    pub num_frames: usize,
}

impl BufferPoolConfig {
    /// Creates a new configuration with the specified number of frames.
    pub fn new(num_frames: usize) -> Self {
        Self { num_frames }
    }

    /// Initial capacity for the page directory: ~1.2x the frame count,
    /// rounded up to the next odd integer.
    pub fn directory_capacity(&self) -> usize {
        let scaled = self.num_frames * DIRECTORY_LOAD_NUM / DIRECTORY_LOAD_DEN;
        if scaled % 2 == 0 {
            scaled + 1
        } else {
            scaled
        }
    }

    /// Returns the memory used by the page pool.
    pub fn memory_usage(&self) -> usize {
        self.num_frames * DEFAULT_PAGE_SIZE
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.num_frames == 0 {
            return Err("num_frames must be > 0");
        }
        Ok(())
    }
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_POOL_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = BufferPoolConfig::new(100);
        assert_eq!(config.num_frames, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_frames_rejected() {
        let config = BufferPoolConfig::new(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directory_capacity_is_odd() {
        for n in [1, 2, 3, 10, 100, 1024] {
            let cap = BufferPoolConfig::new(n).directory_capacity();
            assert_eq!(cap % 2, 1, "capacity for {n} frames must be odd");
            assert!(cap >= n, "directory must not be smaller than the pool");
        }
    }

    #[test]
    fn test_memory_usage() {
        let config = BufferPoolConfig::new(10);
        assert_eq!(config.memory_usage(), 10 * DEFAULT_PAGE_SIZE);
    }
}
