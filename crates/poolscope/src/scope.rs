//! The scoped buffer lease.
//!
//! A [`PoolScope`] rents one buffer on construction and returns it exactly
//! once when dropped (or explicitly [`dispose`](PoolScope::dispose)d).
//! Everything in between sees only the first `len` elements, even when the
//! pool handed out a larger buffer: indexing, search, and every in-place
//! algorithm are confined to `[0, len)`.
//!
//! ```text
//! backing buffer (capacity 8, len 5)
//! ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! │ 0 │ 1 │ 2 │ 3 │ 4 │ · │ · │ · │
//! └───┴───┴───┴───┴───┴───┴───┴───┘
//!  └──── visible view ───┘ └ tail ┘  never read or written by scope ops
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Index, IndexMut, Range, RangeBounds};

use rand::Rng;

use crate::clear::ClearMode;
use crate::enumerator::Enumerator;
use crate::error::{Result, ScopeError};
use crate::pool::ArrayPool;
use crate::shared::SharedPool;

/// A lease on a pooled buffer with a fixed logical length.
///
/// `P` defaults to the process-wide [`SharedPool`] for `T`, which is what
/// the pool-less constructors ([`new`](PoolScope::new),
/// [`from_slice`](PoolScope::from_slice), ...) rent from.
///
/// Disposal consumes the scope, so a buffer can neither be returned twice
/// nor used after it went back to the pool.
#[must_use = "dropping a scope immediately returns its buffer to the pool"]
pub struct PoolScope<'p, T, P: ArrayPool<T> + ?Sized = SharedPool<T>> {
    /// Full rented buffer. Replaced by an empty box only inside `drop`.
    buffer: Box<[T]>,
    /// Logical length; `len <= buffer.len()`.
    len: usize,
    pool: &'p P,
    clear_mode: ClearMode,
}

impl<T: Default + Send + 'static> PoolScope<'static, T> {
    /// Rent `len` elements from the shared pool, clearing per [`ClearMode::Auto`].
    pub fn new(len: usize) -> Result<Self> {
        Self::rent_in_with_mode(len, SharedPool::global(), ClearMode::Auto)
    }

    /// Rent `len` elements from the shared pool with an explicit clear mode.
    pub fn with_mode(len: usize, clear_mode: ClearMode) -> Result<Self> {
        Self::rent_in_with_mode(len, SharedPool::global(), clear_mode)
    }

    /// Copy `src` into a buffer rented from the shared pool.
    ///
    /// Accepts anything that derefs to a slice: arrays, `Vec`s, boxed
    /// slices, sub-slices.
    pub fn from_slice(src: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_slice_in(src, SharedPool::global(), ClearMode::Auto)
    }

    /// [`from_slice`](Self::from_slice) with an explicit clear mode.
    pub fn from_slice_with_mode(src: &[T], clear_mode: ClearMode) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_slice_in(src, SharedPool::global(), clear_mode)
    }

    /// Move the items of a sized collection into a buffer rented from the
    /// shared pool.
    pub fn from_collection<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_collection_in(items, SharedPool::global(), ClearMode::Auto)
    }

    /// [`from_collection`](Self::from_collection) with an explicit clear mode.
    pub fn from_collection_with_mode<I>(items: I, clear_mode: ClearMode) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_collection_in(items, SharedPool::global(), clear_mode)
    }
}

impl<'p, T, P: ArrayPool<T> + ?Sized> PoolScope<'p, T, P> {
    /// Rent `len` elements from `pool`, clearing per [`ClearMode::Auto`].
    pub fn rent_in(len: usize, pool: &'p P) -> Result<Self> {
        Self::rent_in_with_mode(len, pool, ClearMode::Auto)
    }

    /// Rent `len` elements from `pool`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UndersizedBuffer`] if the pool breaks its contract and
    /// returns fewer than `len` elements. The buffer is handed straight back
    /// before the error is reported.
    pub fn rent_in_with_mode(len: usize, pool: &'p P, clear_mode: ClearMode) -> Result<Self> {
        let buffer = pool.rent(len);
        let capacity = buffer.len();
        if capacity < len {
            pool.return_buffer(buffer, clear_mode.should_clear::<T>());
            return Err(ScopeError::UndersizedBuffer {
                requested: len,
                capacity,
            });
        }
        tracing::trace!(len, capacity, %clear_mode, "rented scope");
        Ok(Self {
            buffer,
            len,
            pool,
            clear_mode,
        })
    }

    /// Rent a buffer from `pool` sized to `src` and clone `src` into it.
    pub fn from_slice_in(src: &[T], pool: &'p P, clear_mode: ClearMode) -> Result<Self>
    where
        T: Clone,
    {
        let mut scope = Self::rent_in_with_mode(src.len(), pool, clear_mode)?;
        scope.as_mut_slice().clone_from_slice(src);
        Ok(scope)
    }

    /// Rent a buffer from `pool` sized to the collection and move its items in.
    ///
    /// The length is the number of items actually produced, which for a
    /// well-behaved [`ExactSizeIterator`] is the reported length.
    pub fn from_collection_in<I>(items: I, pool: &'p P, clear_mode: ClearMode) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let mut scope = Self::rent_in_with_mode(items.len(), pool, clear_mode)?;
        let mut written = 0;
        for (slot, item) in scope.buffer[..scope.len].iter_mut().zip(items) {
            *slot = item;
            written += 1;
        }
        scope.len = written;
        Ok(scope)
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity of the backing buffer (at least [`len`](Self::len)).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Clear policy applied on disposal.
    pub fn clear_mode(&self) -> ClearMode {
        self.clear_mode
    }

    /// The pool this scope returns to.
    pub fn pool(&self) -> &'p P {
        self.pool
    }

    /// The visible elements, `[0, len)`.
    pub fn as_slice(&self) -> &[T] {
        &self.buffer[..self.len]
    }

    /// The visible elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buffer[..self.len]
    }

    /// The whole backing buffer, including the tail past `len`.
    ///
    /// This bypasses the length bound. The tail holds whatever the pool left
    /// there; do not rely on it, and do not keep the borrow around the
    /// scope's own operations.
    pub fn backing_buffer(&self) -> &[T] {
        &self.buffer
    }

    /// The whole backing buffer, mutably. See [`backing_buffer`](Self::backing_buffer).
    pub fn backing_buffer_mut(&mut self) -> &mut [T] {
        &mut self.buffer
    }

    /// Element at `index`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::OutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ScopeError::OutOfRange { index, len })
    }

    /// Mutable element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ScopeError::OutOfRange { index, len })
    }

    /// Overwrite the element at `index`. Nothing changes on error.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Sub-view of `[0, len)`.
    ///
    /// Both endpoints must lie within `[0, len]` and be ordered.
    pub fn subslice<R: RangeBounds<usize>>(&self, range: R) -> Result<&[T]> {
        let range = self.check_range(range)?;
        Ok(&self.as_slice()[range])
    }

    /// Mutable sub-view of `[0, len)`.
    pub fn subslice_mut<R: RangeBounds<usize>>(&mut self, range: R) -> Result<&mut [T]> {
        let range = self.check_range(range)?;
        Ok(&mut self.as_mut_slice()[range])
    }

    fn check_range<R: RangeBounds<usize>>(&self, range: R) -> Result<Range<usize>> {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1).ok_or(ScopeError::OutOfRange { index: s, len })?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.checked_add(1).ok_or(ScopeError::OutOfRange { index: e, len })?,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > len {
            return Err(ScopeError::OutOfRange { index: start, len });
        }
        if end > len || end < start {
            return Err(ScopeError::OutOfRange { index: end, len });
        }
        Ok(start..end)
    }

    /// Clone `[0, len)` into `destination[offset..offset + len]`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::DestinationTooShort`] if the destination cannot hold
    /// `len` elements from `offset`; nothing is written in that case.
    pub fn copy_to(&self, destination: &mut [T], offset: usize) -> Result<()>
    where
        T: Clone,
    {
        let available = destination.len();
        let required = offset
            .checked_add(self.len)
            .filter(|&end| end <= available)
            .ok_or(ScopeError::DestinationTooShort {
                required: offset.saturating_add(self.len),
                available,
            })?;
        destination[offset..required].clone_from_slice(self.as_slice());
        Ok(())
    }

    /// Clone `[0, len)` into the start of `destination`.
    pub fn copy_to_slice(&self, destination: &mut [T]) -> Result<()>
    where
        T: Clone,
    {
        self.copy_to(destination, 0)
    }

    /// Copy the visible elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    /// Whether `item` occurs in `[0, len)`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(item)
    }

    /// Whether any element in `[0, len)` is equal to `item` under `eq`.
    pub fn contains_by<F>(&self, item: &T, eq: F) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.index_of_by(item, eq).is_some()
    }

    /// First index in `[0, len)` holding `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|x| x == item)
    }

    /// First index in `[0, len)` whose element equals `item` under `eq`.
    ///
    /// `eq` receives the stored element first and `item` second.
    pub fn index_of_by<F>(&self, item: &T, mut eq: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.as_slice().iter().position(|x| eq(x, item))
    }

    /// Reverse `[0, len)` in place.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Stable sort of `[0, len)` by natural order.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.as_mut_slice().sort();
    }

    /// Stable sort of `[0, len)` with a comparison function.
    ///
    /// `compare` is never called when `len <= 1`.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.len <= 1 {
            return;
        }
        self.as_mut_slice().sort_by(compare);
    }

    /// Stable sort of `[0, len)` by a derived key.
    pub fn sort_by_key<K, F>(&mut self, key: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.as_mut_slice().sort_by_key(key);
    }

    /// Shuffle `[0, len)` using the calling thread's RNG.
    ///
    /// This is the only place the crate reaches for an implicit random
    /// source. Use [`shuffle_with`](Self::shuffle_with) for reproducible
    /// or independent streams.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Fisher–Yates shuffle of `[0, len)` driven by `rng`.
    ///
    /// Walks `i` from `len - 1` down to `1`, swapping each element with a
    /// uniformly chosen `j` in `[0, i]`.
    pub fn shuffle_with<R: Rng>(&mut self, rng: &mut R) {
        let view = self.as_mut_slice();
        for i in (1..view.len()).rev() {
            let j = rng.random_range(0..=i);
            view.swap(i, j);
        }
    }

    /// Whether every element of `[0, len)` satisfies `predicate`.
    ///
    /// Always true for an empty scope.
    pub fn true_for_all<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.as_slice().iter().all(predicate)
    }

    /// Iterator over `[0, len)`.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable iterator over `[0, len)`.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Resettable cursor over `[0, len)`.
    pub fn enumerator(&self) -> Enumerator<'_, T> {
        Enumerator::new(self.as_slice())
    }

    /// Return the buffer to the pool now.
    ///
    /// Equivalent to dropping the scope.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<T, P: ArrayPool<T> + ?Sized> Drop for PoolScope<'_, T, P> {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        let clear = self.clear_mode.should_clear::<T>();
        tracing::trace!(
            len = self.len,
            capacity = buffer.len(),
            clear,
            "returning scope buffer"
        );
        self.pool.return_buffer(buffer, clear);
    }
}

impl<T, P: ArrayPool<T> + ?Sized> Index<usize> for PoolScope<'_, T, P> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`. Use [`PoolScope::get`] for a fallible lookup.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, P: ArrayPool<T> + ?Sized> IndexMut<usize> for PoolScope<'_, T, P> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T, P: ArrayPool<T> + ?Sized> IntoIterator for &'a PoolScope<'_, T, P> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, P: ArrayPool<T> + ?Sized> IntoIterator for &'a mut PoolScope<'_, T, P> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug, P: ArrayPool<T> + ?Sized> fmt::Debug for PoolScope<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolScope")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("clear_mode", &self.clear_mode)
            .field("items", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;

    const SENTINEL: i32 = 9;

    /// Hands out buffers of a fixed capacity padded with `SENTINEL`, and
    /// records every return.
    struct PaddedPool {
        capacity: usize,
        returns: RefCell<Vec<(Vec<i32>, bool)>>,
    }

    impl PaddedPool {
        fn new(capacity: usize) -> Self {
            Self {
                capacity,
                returns: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArrayPool<i32> for PaddedPool {
        fn rent(&self, min_len: usize) -> Box<[i32]> {
            vec![SENTINEL; self.capacity.max(min_len)].into_boxed_slice()
        }

        fn return_buffer(&self, buffer: Box<[i32]>, clear: bool) {
            self.returns.borrow_mut().push((buffer.into_vec(), clear));
        }
    }

    /// Always returns a buffer one element short.
    struct ShortPool {
        returned: RefCell<usize>,
    }

    impl ArrayPool<i32> for ShortPool {
        fn rent(&self, min_len: usize) -> Box<[i32]> {
            vec![0; min_len.saturating_sub(1)].into_boxed_slice()
        }

        fn return_buffer(&self, _buffer: Box<[i32]>, _clear: bool) {
            *self.returned.borrow_mut() += 1;
        }
    }

    fn sample(pool: &PaddedPool) -> PoolScope<'_, i32, PaddedPool> {
        PoolScope::from_slice_in(&[3, 1, 4, 1, 5], pool, ClearMode::Auto).unwrap()
    }

    fn tail<'a>(scope: &'a PoolScope<'_, i32, PaddedPool>) -> &'a [i32] {
        &scope.backing_buffer()[scope.len()..]
    }

    #[test]
    fn rent_preserves_requested_len() {
        let pool = PaddedPool::new(8);
        for len in [0, 1, 5, 8, 20] {
            let scope = PoolScope::rent_in(len, &pool).unwrap();
            assert_eq!(scope.len(), len);
            assert!(scope.capacity() >= len);
        }
    }

    #[test]
    fn from_slice_copies_in_order() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        assert_eq!(scope.as_slice(), &[3, 1, 4, 1, 5]);
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn from_collection_moves_items() {
        let pool = PaddedPool::new(4);
        let scope =
            PoolScope::from_collection_in(vec![10, 20, 30], &pool, ClearMode::Never).unwrap();
        assert_eq!(scope.as_slice(), &[10, 20, 30]);
        assert_eq!(scope.clear_mode(), ClearMode::Never);
    }

    #[test]
    fn undersized_buffer_is_returned_and_rejected() {
        let pool = ShortPool {
            returned: RefCell::new(0),
        };
        let err = PoolScope::rent_in(4, &pool).unwrap_err();
        assert_eq!(
            err,
            ScopeError::UndersizedBuffer {
                requested: 4,
                capacity: 3
            }
        );
        assert_eq!(*pool.returned.borrow(), 1);
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        assert_eq!(scope.get(4), Ok(&5));
        assert_eq!(
            scope.get(5),
            Err(ScopeError::OutOfRange { index: 5, len: 5 })
        );
        assert!(scope.get(6).is_err());
        assert!(scope.set(5, 0).is_err());
        assert_eq!(tail(&scope), &[SENTINEL; 3]);

        scope.set(0, 42).unwrap();
        assert_eq!(scope[0], 42);
        scope[1] = 7;
        assert_eq!(scope.get(1), Ok(&7));
    }

    #[test]
    #[should_panic(expected = "index 5 out of range for scope of length 5")]
    fn index_past_len_panics() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        let _ = scope[5];
    }

    #[test]
    fn sort_search_example() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        scope.sort();
        assert_eq!(scope.as_slice(), &[1, 1, 3, 4, 5]);
        assert_eq!(scope.index_of(&4), Some(3));
        assert!(!scope.contains(&9));
        assert!(scope.contains(&3));
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn sentinel_in_tail_is_invisible_to_search() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        assert!(!scope.contains(&SENTINEL));
        assert_eq!(scope.index_of(&SENTINEL), None);
        assert!(!scope.contains_by(&SENTINEL, |a, b| a == b));
    }

    #[test]
    fn comparer_forms_use_supplied_equality() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        let same_parity = |a: &i32, b: &i32| a % 2 == b % 2;
        assert_eq!(scope.index_of_by(&2, same_parity), Some(2));
        assert!(scope.contains_by(&2, same_parity));
        assert_eq!(scope.index_of_by(&100, |a, b| a == b), None);
    }

    #[test]
    fn reverse_is_confined_to_len() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        scope.reverse();
        assert_eq!(scope.as_slice(), &[5, 1, 4, 1, 3]);
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn sort_by_and_sort_by_key() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        scope.sort_by(|a, b| b.cmp(a));
        assert_eq!(scope.as_slice(), &[5, 4, 3, 1, 1]);
        scope.sort_by_key(|v| (v - 3).abs());
        assert_eq!(scope.as_slice(), &[3, 4, 5, 1, 1]);
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn sort_by_skips_comparison_for_short_scopes() {
        let pool = PaddedPool::new(4);
        for len in [0, 1] {
            let mut scope = PoolScope::rent_in(len, &pool).unwrap();
            let mut calls = 0;
            scope.sort_by(|a, b| {
                calls += 1;
                a.cmp(b)
            });
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn shuffle_is_a_permutation_confined_to_len() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        scope.shuffle_with(&mut rng);
        let mut sorted = scope.to_vec();
        sorted.sort();
        assert_eq!(sorted, vec![1, 1, 3, 4, 5]);
        assert_eq!(tail(&scope), &[SENTINEL; 3]);

        scope.shuffle();
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn shuffle_with_same_seed_is_reproducible() {
        let pool = PaddedPool::new(16);
        let src: Vec<i32> = (0..12).collect();
        let mut a = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
        let mut b = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
        a.shuffle_with(&mut ChaCha8Rng::seed_from_u64(99));
        b.shuffle_with(&mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn true_for_all_is_vacuous_on_empty() {
        let pool = PaddedPool::new(4);
        let scope = PoolScope::rent_in(0, &pool).unwrap();
        assert!(scope.true_for_all(|_| false));
    }

    #[test]
    fn true_for_all_ignores_tail() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        assert!(scope.true_for_all(|&v| v < SENTINEL));
        assert!(!scope.true_for_all(|&v| v > 1));
    }

    #[test]
    fn copy_to_respects_offset() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        let mut dest = [0; 8];
        scope.copy_to(&mut dest, 2).unwrap();
        assert_eq!(dest, [0, 0, 3, 1, 4, 1, 5, 0]);
    }

    #[test]
    fn copy_to_short_destination_writes_nothing() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        let mut dest = [0; 6];
        let err = scope.copy_to(&mut dest, 2).unwrap_err();
        assert_eq!(
            err,
            ScopeError::DestinationTooShort {
                required: 7,
                available: 6
            }
        );
        assert_eq!(dest, [0; 6]);
        assert!(scope.copy_to(&mut dest, usize::MAX).is_err());
    }

    #[test]
    fn subslice_bounds() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        assert_eq!(scope.subslice(1..3).unwrap(), &[1, 4]);
        assert_eq!(scope.subslice(2..).unwrap(), &[4, 1, 5]);
        assert_eq!(scope.subslice(..=1).unwrap(), &[3, 1]);
        assert_eq!(scope.subslice(5..).unwrap(), &[] as &[i32]);
        assert_eq!(
            scope.subslice(..6),
            Err(ScopeError::OutOfRange { index: 6, len: 5 })
        );
        assert_eq!(
            scope.subslice(6..),
            Err(ScopeError::OutOfRange { index: 6, len: 5 })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = scope.subslice(3..2);
        assert!(reversed.is_err());
    }

    #[test]
    fn dispose_returns_once_with_resolved_flag() {
        let pool = PaddedPool::new(8);
        sample(&pool).dispose();
        let returns = pool.returns.borrow();
        assert_eq!(returns.len(), 1);
        // i32 is inline data, so Auto resolves to "don't clear".
        assert!(!returns[0].1);
        assert_eq!(&returns[0].0[..5], &[3, 1, 4, 1, 5]);
    }

    #[test]
    fn drop_returns_with_each_mode() {
        let pool = PaddedPool::new(4);
        for mode in ClearMode::ALL {
            let _scope = PoolScope::rent_in_with_mode(2, &pool, mode).unwrap();
        }
        let flags: Vec<bool> = pool.returns.borrow().iter().map(|(_, c)| *c).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn iteration_covers_visible_elements_only() {
        let pool = PaddedPool::new(8);
        let mut scope = sample(&pool);
        let seen: Vec<i32> = (&scope).into_iter().copied().collect();
        assert_eq!(seen, vec![3, 1, 4, 1, 5]);
        for v in &mut scope {
            *v *= 10;
        }
        assert_eq!(scope.as_slice(), &[30, 10, 40, 10, 50]);
        assert_eq!(tail(&scope), &[SENTINEL; 3]);
    }

    #[test]
    fn pool_accessor_is_the_lender() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        assert!(std::ptr::eq(scope.pool(), &pool));
        scope.pool().return_buffer(vec![0].into_boxed_slice(), true);
        assert_eq!(pool.returns.borrow().len(), 1);
    }

    #[test]
    fn debug_shows_visible_items() {
        let pool = PaddedPool::new(8);
        let scope = sample(&pool);
        let text = format!("{scope:?}");
        assert!(text.contains("len: 5"));
        assert!(text.contains("capacity: 8"));
        assert!(text.contains("items: [3, 1, 4, 1, 5]"));
    }

    #[test]
    fn shared_pool_constructors() {
        let scope = PoolScope::<u8>::new(10).unwrap();
        assert_eq!(scope.len(), 10);
        assert_eq!(scope.clear_mode(), ClearMode::Auto);

        let scope = PoolScope::from_slice(&[1u8, 2, 3]).unwrap();
        assert_eq!(scope.as_slice(), &[1, 2, 3]);

        let scope = PoolScope::from_collection(vec![String::from("a"), String::from("b")])
            .unwrap();
        assert_eq!(scope.as_slice(), &["a", "b"]);

        let scope = PoolScope::<u8>::with_mode(3, ClearMode::Always).unwrap();
        assert_eq!(scope.clear_mode(), ClearMode::Always);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_mode() -> impl Strategy<Value = ClearMode> {
            prop::sample::select(ClearMode::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn len_matches_request(len in 0usize..64, mode in any_mode()) {
                let pool = PaddedPool::new(16);
                let scope = PoolScope::rent_in_with_mode(len, &pool, mode).unwrap();
                prop_assert_eq!(scope.len(), len);
            }

            #[test]
            fn copy_round_trips(src in proptest::collection::vec(any::<i32>(), 0..40)) {
                let pool = PaddedPool::new(48);
                let scope = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
                prop_assert_eq!(scope.len(), src.len());
                for (i, v) in src.iter().enumerate() {
                    prop_assert_eq!(scope.get(i), Ok(v));
                }
            }

            #[test]
            fn out_of_range_past_len(src in proptest::collection::vec(any::<i32>(), 1..20)) {
                let pool = PaddedPool::new(32);
                let scope = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
                let len = src.len();
                let is_out_of_range = |r: Result<&i32>| matches!(r, Err(ScopeError::OutOfRange { .. }));
                prop_assert!(is_out_of_range(scope.get(len)));
                prop_assert!(is_out_of_range(scope.get(len + 1)));
                prop_assert!(is_out_of_range(scope.get(usize::MAX)));
            }

            #[test]
            fn algorithms_leave_tail_untouched(
                src in proptest::collection::vec(-100i32..100, 0..16),
                seed in any::<u64>(),
            ) {
                let pool = PaddedPool::new(24);
                let mut scope = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
                let tail_len = scope.capacity() - scope.len();

                scope.sort();
                prop_assert!(tail(&scope).iter().all(|&v| v == SENTINEL));
                scope.reverse();
                prop_assert!(tail(&scope).iter().all(|&v| v == SENTINEL));
                scope.sort_by(|a, b| b.cmp(a));
                prop_assert!(tail(&scope).iter().all(|&v| v == SENTINEL));
                scope.shuffle_with(&mut ChaCha8Rng::seed_from_u64(seed));
                prop_assert!(tail(&scope).iter().all(|&v| v == SENTINEL));
                prop_assert_eq!(tail(&scope).len(), tail_len);
            }

            #[test]
            fn true_for_all_matches_iter_all(src in proptest::collection::vec(0i32..10, 0..20)) {
                let pool = PaddedPool::new(32);
                let scope = PoolScope::from_slice_in(&src, &pool, ClearMode::Auto).unwrap();
                prop_assert_eq!(scope.true_for_all(|&v| v < 5), src.iter().all(|&v| v < 5));
            }
        }
    }
}
