//! Resettable forward cursor over a scope's visible elements.

use std::iter::FusedIterator;

/// Cursor over `[0, len)` of a [`PoolScope`](crate::PoolScope).
///
/// The cursor runs from `0` to `len`. Before the first
/// [`move_next`](Enumerator::move_next) there is no current element; each
/// successful `move_next` caches the element it stepped over. Once the
/// cursor reaches `len`, `move_next` keeps returning `false` until
/// [`reset`](Enumerator::reset) rewinds it.
///
/// The enumerator only borrows the view, so dropping it releases nothing.
/// It also implements [`Iterator`], driven by `move_next`.
#[derive(Debug)]
pub struct Enumerator<'a, T> {
    view: &'a [T],
    cursor: usize,
    current: Option<&'a T>,
}

impl<'a, T> Enumerator<'a, T> {
    /// Enumerator positioned before the first element of `view`.
    pub fn new(view: &'a [T]) -> Self {
        Self {
            view,
            cursor: 0,
            current: None,
        }
    }

    /// Advance to the next element.
    ///
    /// Returns `false` once every element has been visited; the current
    /// element is left as it was.
    pub fn move_next(&mut self) -> bool {
        match self.view.get(self.cursor) {
            Some(item) => {
                self.current = Some(item);
                self.cursor += 1;
                true
            }
            None => false,
        }
    }

    /// The element cached by the last successful `move_next`.
    pub fn current(&self) -> Option<&'a T> {
        self.current
    }

    /// Rewind to before the first element.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.current = None;
    }

    /// Number of elements visited so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether every element has been visited.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.view.len()
    }
}

impl<T> Clone for Enumerator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            view: self.view,
            cursor: self.cursor,
            current: self.current,
        }
    }
}

impl<'a, T> Iterator for Enumerator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.move_next() {
            self.current
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Enumerator<'_, T> {}

impl<T> FusedIterator for Enumerator<'_, T> {}
