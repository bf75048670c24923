//! Reusable element fixtures.
//!
//! - [`Inline`]: plain data, classified as inline by the clear resolver.
//! - [`Owned`]: wraps a heap allocation, classified as resource-bearing.
//! - [`DropCounter`] / [`Tracked`]: count how many elements were dropped,
//!   for checking that pooled buffers are released exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Inline element with no owned resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Inline {
    pub id: u32,
    pub weight: i16,
}

impl Inline {
    pub fn new(id: u32, weight: i16) -> Self {
        Self { id, weight }
    }
}

/// Element holding a heap allocation one level down.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Owned {
    pub id: u32,
    pub label: Label,
}

/// Nested owner; makes [`Owned`] resource-bearing transitively.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub String);

impl Owned {
    pub fn new(id: u32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: Label(label.into()),
        }
    }
}

/// Shared drop counter for [`Tracked`] elements.
#[derive(Clone, Debug, Default)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element tied to this counter.
    pub fn track(&self, value: u32) -> Tracked {
        Tracked {
            value,
            counter: Some(self.clone()),
        }
    }

    /// Drops observed so far.
    pub fn drops(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Element that bumps its [`DropCounter`] when dropped.
///
/// `Tracked::default()` has no counter, so filler elements created by a
/// pool are not counted.
#[derive(Clone, Debug, Default)]
pub struct Tracked {
    pub value: u32,
    counter: Option<DropCounter>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        if let Some(counter) = &self.counter {
            counter.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
