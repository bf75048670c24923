//! Clear-on-return policy and its resolver.
//!
//! When a scope hands its buffer back, the pool may zero the contents
//! before the buffer is reused. [`ClearMode`] is the caller's policy and
//! [`ClearMode::resolve`] turns it into the boolean the pool receives.

use std::fmt;
use std::str::FromStr;

use crate::error::ScopeError;

/// Policy deciding whether a buffer is cleared when returned to its pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClearMode {
    /// Clear only if the element type is [`ElementKind::ResourceBearing`].
    #[default]
    Auto = 0,
    /// Always clear.
    Always = 1,
    /// Never clear.
    Never = 2,
}

/// Memory category of an element type, as seen by [`ClearMode::Auto`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Plain inline data with no owned resources (integers, floats,
    /// arrays and tuples of them). Stale values are harmless to reuse.
    Inline,
    /// The type owns something with drop glue, directly or through a
    /// nested field: heap allocations, handles, reference-counted pointers.
    /// Leaving such values in a pooled buffer keeps them alive and lets the
    /// next renter observe them.
    ResourceBearing,
}

impl ElementKind {
    /// Classify `T`.
    ///
    /// Uses [`std::mem::needs_drop`], which is transitive over fields.
    /// Secrets stored as plain inline data (e.g. `[u8; 32]` keys) classify
    /// as `Inline`; use [`ClearMode::Always`] for those.
    pub fn of<T>() -> Self {
        if std::mem::needs_drop::<T>() {
            Self::ResourceBearing
        } else {
            Self::Inline
        }
    }
}

impl ClearMode {
    /// All modes, in discriminant order.
    pub const ALL: [ClearMode; 3] = [ClearMode::Auto, ClearMode::Always, ClearMode::Never];

    /// Resolve this policy for an element of the given kind.
    pub fn resolve(self, kind: ElementKind) -> bool {
        match self {
            Self::Auto => kind == ElementKind::ResourceBearing,
            Self::Always => true,
            Self::Never => false,
        }
    }

    /// Resolve this policy for element type `T`.
    pub fn should_clear<T>(self) -> bool {
        self.resolve(ElementKind::of::<T>())
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ClearMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClearMode> for u8 {
    fn from(mode: ClearMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for ClearMode {
    type Error = ScopeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Always),
            2 => Ok(Self::Never),
            other => Err(ScopeError::InvalidArgument {
                name: "clear_mode",
                reason: format!("unknown clear mode value {other}"),
            }),
        }
    }
}

impl FromStr for ClearMode {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScopeError::InvalidArgument {
                name: "clear_mode",
                reason: format!("unknown clear mode `{s}`"),
            })
    }
}
