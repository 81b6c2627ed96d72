//! Whole-run configuration for a replay.
//!
//! The query mode applies to every query record in the stream; it is chosen
//! once at startup, never per record.

use std::fmt;
use std::str::FromStr;

use crate::error::{OracleError, Result};

/// Neighbor count used by the reference driver's `10NN` mode
pub const DEFAULT_K: usize = 10;

/// How query records are interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryMode {
    /// Report every object whose rectangle intersects the query rectangle
    Intersection,
    /// Report the `k` nearest objects to the query's first corner, plus ties
    Nearest {
        /// Neighbor count before tie extension
        k: usize,
    },
}

impl QueryMode {
    /// Parses a mode name, using `default_k` for the bare `knn` spelling.
    ///
    /// Accepted: `intersection`, `knn`, and `<k>NN` such as `10NN`. The count
    /// in `<k>NN` is plain decimal digits with no sign and no leading zero.
    ///
    /// # Errors
    ///
    /// [`OracleError::UnknownQueryMode`] for any other name, and
    /// [`OracleError::InvalidConfig`] when the neighbor count is zero.
    pub fn parse_with_k(name: &str, default_k: usize) -> Result<Self> {
        let unknown = || OracleError::UnknownQueryMode(name.to_string());
        let mode = if name.eq_ignore_ascii_case("intersection") {
            Self::Intersection
        } else if name.eq_ignore_ascii_case("knn") {
            Self::Nearest { k: default_k }
        } else if let Some(digits) = name.strip_suffix("NN").or_else(|| name.strip_suffix("nn")) {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unknown());
            }
            if digits.len() > 1 && digits.starts_with('0') {
                return Err(unknown());
            }
            let k = digits.parse::<usize>().map_err(|_| unknown())?;
            Self::Nearest { k }
        } else {
            return Err(unknown());
        };

        if let Self::Nearest { k: 0 } = mode {
            return Err(OracleError::InvalidConfig(
                "nearest-neighbor count must be at least 1".to_string(),
            ));
        }
        Ok(mode)
    }
}

impl FromStr for QueryMode {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_k(s, DEFAULT_K)
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intersection => write!(f, "intersection"),
            Self::Nearest { k } => write!(f, "{}NN", k),
        }
    }
}

/// Settings for one replay of a workload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Query mode for every query record
    pub mode: QueryMode,
}

impl ReplayConfig {
    /// Settings for the given mode
    pub fn new(mode: QueryMode) -> Self {
        Self { mode }
    }

    /// Intersection mode
    pub fn intersection() -> Self {
        Self::new(QueryMode::Intersection)
    }

    /// Nearest-neighbor mode with `k` neighbors
    pub fn nearest(k: usize) -> Self {
        Self::new(QueryMode::Nearest { k })
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::intersection()
    }
}
