//! Shared pool configuration parameters.

use crate::error::ScopeError;

/// Configuration for a [`SharedPool`](crate::SharedPool).
///
/// Controls bucket sizing and how many idle buffers are retained.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedPoolConfig {
    /// Capacity of the smallest bucket, in elements.
    ///
    /// Default: 16. Must be a power of two.
    pub min_capacity: usize,

    /// Capacity of the largest bucket, in elements.
    ///
    /// Default: 1_048_576. Must be a power of two and at least
    /// `min_capacity`. Larger requests are allocated exactly and
    /// dropped on return instead of being retained.
    pub max_capacity: usize,

    /// Maximum number of idle buffers kept per bucket.
    ///
    /// Default: 32. Buffers returned to a full bucket are dropped.
    pub max_retained_per_bucket: usize,
}

impl SharedPoolConfig {
    /// Default smallest bucket capacity.
    pub const DEFAULT_MIN_CAPACITY: usize = 16;

    /// Default largest bucket capacity (2^20 elements).
    pub const DEFAULT_MAX_CAPACITY: usize = 1 << 20;

    /// Default per-bucket retention limit.
    pub const DEFAULT_MAX_RETAINED_PER_BUCKET: usize = 32;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
            max_retained_per_bucket: Self::DEFAULT_MAX_RETAINED_PER_BUCKET,
        }
    }

    /// Set the smallest bucket capacity.
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Set the largest bucket capacity.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set the per-bucket retention limit.
    pub fn with_max_retained_per_bucket(mut self, max_retained: usize) -> Self {
        self.max_retained_per_bucket = max_retained;
        self
    }

    /// Check the invariants documented on each field.
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !self.min_capacity.is_power_of_two() {
            return Err(ScopeError::InvalidConfig {
                reason: format!(
                    "min_capacity must be a power of two (got {})",
                    self.min_capacity
                ),
            });
        }
        if !self.max_capacity.is_power_of_two() {
            return Err(ScopeError::InvalidConfig {
                reason: format!(
                    "max_capacity must be a power of two (got {})",
                    self.max_capacity
                ),
            });
        }
        if self.max_capacity < self.min_capacity {
            return Err(ScopeError::InvalidConfig {
                reason: format!(
                    "max_capacity ({}) must be >= min_capacity ({})",
                    self.max_capacity, self.min_capacity
                ),
            });
        }
        Ok(())
    }

    /// Number of buckets implied by the capacity range.
    pub fn bucket_count(&self) -> usize {
        (self.max_capacity.trailing_zeros() - self.min_capacity.trailing_zeros()) as usize + 1
    }

    /// Capacity of bucket `index`.
    pub fn bucket_capacity(&self, index: usize) -> usize {
        self.min_capacity << index
    }

    /// Bucket serving requests of `len` elements, or `None` if `len`
    /// exceeds `max_capacity`.
    pub fn bucket_for(&self, len: usize) -> Option<usize> {
        if len > self.max_capacity {
            return None;
        }
        let rounded = len.max(self.min_capacity).next_power_of_two();
        Some((rounded.trailing_zeros() - self.min_capacity.trailing_zeros()) as usize)
    }
}

impl Default for SharedPoolConfig {
    fn default() -> Self {
        Self::new()
    }
}
