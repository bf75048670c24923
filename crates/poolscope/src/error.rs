//! Scope and pool error types.

use std::error::Error;
use std::fmt;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Errors that can occur while constructing or using a [`PoolScope`].
///
/// Validation happens before any element is mutated, so an `Err` never
/// leaves a scope half-written. The one exception to "nothing happened" is
/// [`UndersizedBuffer`](ScopeError::UndersizedBuffer): it is only detectable
/// after a rent, and the short buffer has already been handed back to its
/// pool by the time the error is returned.
///
/// [`PoolScope`]: crate::PoolScope
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// An argument could not be accepted (e.g. an undecodable clear-mode value).
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
    /// An index or range fell outside the scope's logical length.
    OutOfRange {
        /// The rejected index (for ranges, the first out-of-bounds endpoint).
        index: usize,
        /// Logical length of the scope.
        len: usize,
    },
    /// A copy destination has too little room for the scope's contents.
    DestinationTooShort {
        /// Number of slots the copy needs, counted from the start of the destination.
        required: usize,
        /// Length of the destination.
        available: usize,
    },
    /// The pool handed out a buffer shorter than requested.
    UndersizedBuffer {
        /// Number of elements requested.
        requested: usize,
        /// Capacity of the buffer actually returned.
        capacity: usize,
    },
    /// A pool configuration failed validation.
    InvalidConfig {
        /// Description of the rejected setting.
        reason: String,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{name}`: {reason}")
            }
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for scope of length {len}")
            }
            Self::DestinationTooShort {
                required,
                available,
            } => {
                write!(
                    f,
                    "destination too short: need {required} slots, have {available}"
                )
            }
            Self::UndersizedBuffer {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "pool returned an undersized buffer: requested {requested}, got capacity {capacity}"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid pool config: {reason}")
            }
        }
    }
}

impl Error for ScopeError {}
