//! Scoped, bounds-checked leases over pooled, reusable buffers.
//!
//! A [`PoolScope`] rents one buffer from an [`ArrayPool`] when it is
//! created and hands it back exactly once when it is dropped. In between it
//! behaves like a fixed-length slice of the requested size, even though the
//! pool may have handed out a larger buffer.
//!
//! # Architecture
//!
//! ```text
//! PoolScope<'p, T, P> (one lease)
//! ├── Box<[T]>           rented buffer, capacity >= len
//! ├── len                logical length, fixed at construction
//! ├── &'p P: ArrayPool   where the buffer goes back to
//! └── ClearMode          resolved to a bool on return
//!
//! SharedPool<T> (default ArrayPool)
//! └── power-of-two buckets, one global instance per T
//! ```
//!
//! # Clearing on return
//!
//! [`ClearMode::Auto`] clears buffers whose element type owns resources
//! (see [`ElementKind`]); [`ClearMode::Always`] and [`ClearMode::Never`]
//! override that.
//!
//! # Example
//!
//! ```
//! use poolscope::PoolScope;
//!
//! let mut scope = PoolScope::from_slice(&[3, 1, 4, 1, 5]).unwrap();
//! scope.sort();
//! assert_eq!(scope.as_slice(), &[1, 1, 3, 4, 5]);
//! assert_eq!(scope.index_of(&4), Some(3));
//! assert!(scope.get(5).is_err());
//! // buffer goes back to the shared pool here
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clear;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod pool;
pub mod scope;
pub mod shared;

// Public re-exports for the primary API surface.
pub use clear::{ClearMode, ElementKind};
pub use config::SharedPoolConfig;
pub use enumerator::Enumerator;
pub use error::{Result, ScopeError};
pub use pool::{ArrayPool, ArrayPoolExt};
pub use scope::PoolScope;
pub use shared::{PoolStats, SharedPool};
