//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use aabb_oracle::prelude::*;
//! ```

pub use crate::config::{QueryMode, ReplayConfig};
pub use crate::error::OracleError;
pub use crate::geometry::{Point, Rect};
pub use crate::query::{evaluate, query_intersecting, query_nearest_k, NnEntry, Query};
pub use crate::record::{OpCode, Operation};
pub use crate::replay::{Replay, ReplayStats};
pub use crate::store::{ObjectId, ObjectStore};
