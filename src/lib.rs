//! # AABB Oracle - Exhaustive Ground Truth for Spatial Index Testing
//!
//! A deliberately simple spatial "index" that answers intersection and
//! k-nearest-neighbor queries over a changing set of axis-aligned rectangles
//! by checking every object. Its answers are exact, so an optimized index
//! (an R-tree, a Hilbert R-tree, ...) can be diffed against it while replaying
//! the same workload of inserts, deletes and queries.
//!
//! ## Features
//!
//! - **Exact Intersection**: closed-interval overlap, touching edges included
//! - **Tie-Aware k-Nearest**: the k nearest objects plus every object tied with the k-th distance
//! - **Dynamic Store**: insert/replace and delete by caller-supplied id
//! - **Workload Replay**: streams `op id x1 y1 x2 y2` records and emits result ids
//! - **Workload Generator**: seeded random insert/move/query streams
//!
//! ## Quick Start
//!
//! ```rust
//! use aabb_oracle::prelude::*;
//!
//! let mut store = ObjectStore::new();
//! store.insert(0, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
//! store.insert(1, Rect::from_xy(5.0, 5.0, 6.0, 6.0));
//! store.insert(2, Rect::from_xy(1.0, 1.0, 2.0, 2.0));
//!
//! // Intersection query (order of ids is unspecified)
//! let mut results = Vec::new();
//! query_intersecting(store.snapshot(), &Rect::from_xy(0.5, 0.5, 1.5, 1.5), &mut results);
//! results.sort();
//! assert_eq!(results, vec![0, 2]);
//!
//! // 1-nearest from (1, 1): objects 0 and 2 both touch the point, so both are reported
//! results.clear();
//! query_nearest_k(store.snapshot(), &Point::xy(1.0, 1.0), 1, &mut results);
//! results.sort();
//! assert_eq!(results, vec![0, 2]);
//! ```
//!
//! ## Replaying a Workload
//!
//! ```rust
//! use aabb_oracle::prelude::*;
//!
//! let workload = "1 0 0.0 0.0 1.0 1.0\n1 1 5.0 5.0 6.0 6.0\n2 9 0.0 0.0 2.0 2.0\n";
//! let mut out = Vec::new();
//! let stats = Replay::new(ReplayConfig::intersection())
//!     .run(workload.as_bytes(), &mut out)
//!     .unwrap();
//! assert_eq!(stats.queries, 1);
//! assert_eq!(String::from_utf8(out).unwrap(), "0\n");
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod record;
pub mod replay;
pub mod store;


pub use config::{QueryMode, ReplayConfig};
pub use error::{OracleError, Result};
pub use geometry::{Point, Rect};
pub use query::{NnEntry, Query};
pub use replay::{Replay, ReplayStats};
pub use store::{ObjectId, ObjectStore, Snapshot};
