//! Default bucketed pool.
//!
//! [`SharedPool`] keeps idle buffers in power-of-two buckets. A rent is
//! served from the smallest bucket that fits, so callers regularly receive
//! more capacity than they asked for; scopes only ever expose the
//! requested length.
//!
//! Each element type has one lazily created process-wide instance, reached
//! through [`SharedPool::global`]. This is the pool behind
//! [`PoolScope::new`](crate::PoolScope::new) and friends.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::{Mutex, RwLock};

use crate::config::SharedPoolConfig;
use crate::error::ScopeError;
use crate::pool::ArrayPool;

/// Snapshot of a pool's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total `rent` calls served.
    pub rented: usize,
    /// Total `return_buffer` calls received.
    pub returned: usize,
    /// Rents that had to allocate a fresh buffer.
    pub allocated: usize,
    /// Idle buffers currently held across all buckets.
    pub retained: usize,
}

/// Thread-safe bucketed buffer pool.
pub struct SharedPool<T> {
    config: SharedPoolConfig,
    /// One idle list per bucket; index `i` holds buffers of
    /// `config.bucket_capacity(i)` elements.
    buckets: Vec<Mutex<Vec<Box<[T]>>>>,
    rented: AtomicUsize,
    returned: AtomicUsize,
    allocated: AtomicUsize,
}

impl<T: Default> SharedPool<T> {
    /// Create a pool, validating `config`.
    pub fn new(config: SharedPoolConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Create a pool with [`SharedPoolConfig::default`].
    pub fn with_defaults() -> Self {
        Self::from_validated(SharedPoolConfig::default())
    }

    fn from_validated(config: SharedPoolConfig) -> Self {
        let buckets = (0..config.bucket_count())
            .map(|_| Mutex::new(Vec::new()))
            .collect();
        Self {
            config,
            buckets,
            rented: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
            allocated: AtomicUsize::new(0),
        }
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &SharedPoolConfig {
        &self.config
    }

    /// Counter snapshot.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            rented: self.rented.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            retained: self.buckets.iter().map(|b| b.lock().len()).sum(),
        }
    }

    /// Drop every idle buffer. Returns how many were released.
    pub fn trim(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| {
                let mut idle = bucket.lock();
                let n = idle.len();
                idle.clear();
                n
            })
            .sum()
    }

    fn allocate(&self, len: usize) -> Box<[T]> {
        self.allocated.fetch_add(1, Ordering::Relaxed);
        std::iter::repeat_with(T::default).take(len).collect()
    }
}

impl<T: Default + Send + 'static> SharedPool<T> {
    /// The process-wide pool for `T`, created with default config on first use.
    ///
    /// The instance lives for the rest of the process.
    pub fn global() -> &'static SharedPool<T> {
        static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
            OnceLock::new();

        let registry = REGISTRY.get_or_init(Default::default);
        let key = TypeId::of::<T>();

        let existing = registry.read().get(&key).copied();
        let entry = match existing {
            Some(entry) => entry,
            None => *registry.write().entry(key).or_insert_with(|| {
                let pool: &'static SharedPool<T> = Box::leak(Box::new(SharedPool::with_defaults()));
                pool as &'static (dyn Any + Send + Sync)
            }),
        };
        entry
            .downcast_ref::<SharedPool<T>>()
            .expect("registry entries are keyed by their element TypeId")
    }
}

impl<T: Default> ArrayPool<T> for SharedPool<T> {
    fn rent(&self, min_len: usize) -> Box<[T]> {
        self.rented.fetch_add(1, Ordering::Relaxed);
        if min_len == 0 {
            return Box::default();
        }
        let Some(index) = self.config.bucket_for(min_len) else {
            tracing::trace!(min_len, "oversized rent, allocating exact buffer");
            return self.allocate(min_len);
        };
        if let Some(buffer) = self.buckets[index].lock().pop() {
            tracing::trace!(min_len, bucket = index, "bucket hit");
            return buffer;
        }
        tracing::trace!(min_len, bucket = index, "bucket miss");
        self.allocate(self.config.bucket_capacity(index))
    }

    fn return_buffer(&self, mut buffer: Box<[T]>, clear: bool) {
        self.returned.fetch_add(1, Ordering::Relaxed);
        let len = buffer.len();
        let index = match self.config.bucket_for(len) {
            Some(index) if self.config.bucket_capacity(index) == len => index,
            _ => return,
        };
        if clear {
            buffer.fill_with(T::default);
        }
        let mut idle = self.buckets[index].lock();
        if idle.len() < self.config.max_retained_per_bucket {
            idle.push(buffer);
        } else {
            tracing::trace!(bucket = index, "bucket full, dropping buffer");
        }
    }
}
