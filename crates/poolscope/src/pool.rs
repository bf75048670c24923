//! The rent/return contract consumed by scopes.

use std::sync::Arc;

use crate::clear::ClearMode;
use crate::error::Result;
use crate::scope::PoolScope;

/// A source of reusable buffers.
///
/// Scopes never look inside the pool: they call [`rent`](ArrayPool::rent)
/// once on construction and [`return_buffer`](ArrayPool::return_buffer)
/// once on disposal. Bucketing, growth and thread-safety are the
/// implementation's business.
pub trait ArrayPool<T> {
    /// Hand out a buffer holding at least `min_len` elements.
    ///
    /// Returning a longer buffer is expected; returning a shorter one is a
    /// contract violation that scopes reject with
    /// [`ScopeError::UndersizedBuffer`](crate::ScopeError::UndersizedBuffer).
    fn rent(&self, min_len: usize) -> Box<[T]>;

    /// Take a buffer back. If `clear` is true the contents must be reset
    /// before the buffer is handed out again.
    fn return_buffer(&self, buffer: Box<[T]>, clear: bool);
}

impl<T, P: ArrayPool<T> + ?Sized> ArrayPool<T> for &P {
    fn rent(&self, min_len: usize) -> Box<[T]> {
        (**self).rent(min_len)
    }

    fn return_buffer(&self, buffer: Box<[T]>, clear: bool) {
        (**self).return_buffer(buffer, clear)
    }
}

impl<T, P: ArrayPool<T> + ?Sized> ArrayPool<T> for Arc<P> {
    fn rent(&self, min_len: usize) -> Box<[T]> {
        (**self).rent(min_len)
    }

    fn return_buffer(&self, buffer: Box<[T]>, clear: bool) {
        (**self).return_buffer(buffer, clear)
    }
}

/// Scope constructors available on every pool.
pub trait ArrayPoolExt<T>: ArrayPool<T> {
    /// Rent a scope of `len` elements from this pool.
    fn rent_scope(&self, len: usize, mode: ClearMode) -> Result<PoolScope<'_, T, Self>> {
        PoolScope::rent_in_with_mode(len, self, mode)
    }

    /// Rent a scope sized to `src` and clone `src` into it.
    fn copy_scope(&self, src: &[T], mode: ClearMode) -> Result<PoolScope<'_, T, Self>>
    where
        T: Clone,
    {
        PoolScope::from_slice_in(src, self, mode)
    }
}

impl<T, P: ArrayPool<T> + ?Sized> ArrayPoolExt<T> for P {}
