//! Tri-state lookup results.
//!
//! Name lookups scan a listing. A missing entry and a failed listing are
//! different facts; [`Lookup`] keeps them apart so each caller can decide
//! whether the difference matters.

use crate::error::{Error, Result};

/// Outcome of resolving a resource by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The listing succeeded and contained a match.
    Found(T),
    /// The listing succeeded and contained no match.
    Absent,
    /// The listing call itself failed.
    Failed(Error),
}

impl<T> Lookup<T> {
    /// Scans a listing result for the first entry accepted by `select`.
    pub fn scan<I, F>(listing: Result<Vec<I>>, select: F) -> Self
    where
        F: FnMut(I) -> Option<T>,
    {
        match listing {
            Ok(items) => items.into_iter().find_map(select).map_or(Self::Absent, Self::Found),
            Err(err) => Self::Failed(err),
        }
    }

    /// Returns true if a match was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the match, treating a failed listing the same as absence.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Failed(_) => None,
        }
    }

    /// Converts into a result where absence is [`Error::NotFound`] and a failed
    /// listing is an [`Error::Upstream`] for `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the lookup found a match.
    pub fn require(self, what: &str, operation: &str) -> Result<T> {
        match self {
            Self::Found(value) => Ok(value),
            Self::Absent => Err(Error::NotFound(what.to_string())),
            Self::Failed(err) => Err(Error::upstream(operation, &err)),
        }
    }
}
