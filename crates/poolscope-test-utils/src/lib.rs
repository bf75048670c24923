//! Test utilities and mock pools for poolscope development.
//!
//! Provides mock implementations of [`ArrayPool`]:
//!
//! - [`RecordingPool`] hands out exact-size buffers and logs every
//!   rent and return, including the clear flag it was given.
//! - [`PaddedPool`] over-allocates to a fixed capacity and fills every
//!   fresh buffer with a sentinel, so tests can prove the tail past a
//!   scope's length is never touched.
//!
//! Element fixtures live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use parking_lot::Mutex;
use poolscope::ArrayPool;

/// One `return_buffer` call observed by a mock pool.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnRecord<T> {
    /// Full buffer contents at the moment of return (before any clearing).
    pub contents: Vec<T>,
    /// The clear flag the scope resolved.
    pub clear: bool,
}

/// Exact-size pool that records every interaction.
///
/// Buffers are filled with `T::default()`. Cleared returns are recorded
/// with their pre-clear contents so tests can inspect what the scope left.
pub struct RecordingPool<T> {
    rents: Mutex<Vec<usize>>,
    returns: Mutex<Vec<ReturnRecord<T>>>,
}

impl<T> RecordingPool<T> {
    pub fn new() -> Self {
        Self {
            rents: Mutex::new(Vec::new()),
            returns: Mutex::new(Vec::new()),
        }
    }

    /// Lengths passed to `rent`, in call order.
    pub fn rent_requests(&self) -> Vec<usize> {
        self.rents.lock().clone()
    }

    /// Number of buffers currently out on lease.
    ///
    /// Saturates at zero when more buffers came back than were rented.
    pub fn outstanding(&self) -> usize {
        self.rents.lock().len().saturating_sub(self.returns.lock().len())
    }

    /// Number of `return_buffer` calls so far.
    pub fn return_count(&self) -> usize {
        self.returns.lock().len()
    }

    /// Clear flags passed to `return_buffer`, in call order.
    pub fn clear_flags(&self) -> Vec<bool> {
        self.returns.lock().iter().map(|r| r.clear).collect()
    }
}

impl<T: Clone> RecordingPool<T> {
    /// Every return so far.
    pub fn returns(&self) -> Vec<ReturnRecord<T>> {
        self.returns.lock().clone()
    }
}

impl<T> Default for RecordingPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone> ArrayPool<T> for RecordingPool<T> {
    fn rent(&self, min_len: usize) -> Box<[T]> {
        self.rents.lock().push(min_len);
        std::iter::repeat_with(T::default).take(min_len).collect()
    }

    fn return_buffer(&self, buffer: Box<[T]>, clear: bool) {
        self.returns.lock().push(ReturnRecord {
            contents: buffer.into_vec(),
            clear,
        });
    }
}

/// Over-allocating pool whose fresh buffers are filled with a sentinel.
///
/// Every rent returns `max(capacity, min_len)` elements, all equal to
/// `sentinel`. Returned buffers are recorded, not reused.
pub struct PaddedPool<T> {
    capacity: usize,
    sentinel: T,
    returns: Mutex<Vec<ReturnRecord<T>>>,
}

impl<T: Clone> PaddedPool<T> {
    pub fn new(capacity: usize, sentinel: T) -> Self {
        Self {
            capacity,
            sentinel,
            returns: Mutex::new(Vec::new()),
        }
    }

    pub fn sentinel(&self) -> &T {
        &self.sentinel
    }

    /// Every return so far.
    pub fn returns(&self) -> Vec<ReturnRecord<T>> {
        self.returns.lock().clone()
    }
}

impl<T: Clone> ArrayPool<T> for PaddedPool<T> {
    fn rent(&self, min_len: usize) -> Box<[T]> {
        vec![self.sentinel.clone(); self.capacity.max(min_len)].into_boxed_slice()
    }

    fn return_buffer(&self, buffer: Box<[T]>, clear: bool) {
        self.returns.lock().push(ReturnRecord {
            contents: buffer.into_vec(),
            clear,
        });
    }
}
