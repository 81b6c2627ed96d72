//! Workload driver: replays an operation stream against the store and engine.
//!
//! Operations run strictly one after another. Inserts and deletes mutate the
//! store between queries; each query reads a snapshot that stays fixed until
//! it has produced all of its ids.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::{QueryMode, ReplayConfig};
use crate::error::Result;
use crate::query::{self, Query};
use crate::record::{OpCode, Operation, Records};
use crate::store::{ObjectId, ObjectStore};

const PROGRESS_INTERVAL: usize = 1000;

/// Counters collected over one replay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records applied
    pub operations: usize,
    /// Inserts, replacements included
    pub inserts: usize,
    /// Successful deletes
    pub deletes: usize,
    /// Query records evaluated
    pub queries: usize,
    /// Total ids emitted across all queries
    pub results: usize,
}

/// Owns the object store for the duration of a replay
#[derive(Clone, Debug)]
pub struct Replay {
    store: ObjectStore,
    config: ReplayConfig,
    stats: ReplayStats,
}

impl Replay {
    /// Creates a replay over an empty store
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            store: ObjectStore::new(),
            config,
            stats: ReplayStats::default(),
        }
    }

    /// Current contents of the store
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Settings this replay was created with
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Counters so far
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Builds the query a query record stands for under the configured mode
    pub fn query_for(&self, operation: &Operation) -> Query {
        match self.config.mode {
            QueryMode::Intersection => Query::Intersection(operation.rect()),
            QueryMode::Nearest { k } => Query::Nearest {
                point: operation.anchor(),
                k,
            },
        }
    }

    /// Applies one operation. Query results are appended to `results`.
    ///
    /// `index` is the 0-based position of the operation in the stream and is
    /// reported if a delete names an unknown id, with `index + 1` as its line.
    ///
    /// # Errors
    ///
    /// [`NotFound`](crate::OracleError::NotFound) if a delete names an id that is not live.
    pub fn apply(&mut self, index: usize, operation: &Operation, results: &mut Vec<ObjectId>) -> Result<()> {
        match operation.op {
            OpCode::Delete => {
                self.store
                    .delete(operation.id)
                    .map_err(|e| e.at_operation(index, index + 1))?;
                self.stats.deletes += 1;
                debug!(index, id = operation.id, "delete");
            }
            OpCode::Insert => {
                let replaced = self.store.insert(operation.id, operation.rect()).is_some();
                self.stats.inserts += 1;
                debug!(index, id = operation.id, replaced, "insert");
            }
            OpCode::Query => {
                let query = self.query_for(operation);
                let before = results.len();
                query::evaluate(self.store.snapshot(), &query, results);
                let found = results.len() - before;
                self.stats.queries += 1;
                self.stats.results += found;
                debug!(index, found, objects = self.store.len(), "query");
            }
        }
        self.stats.operations += 1;
        Ok(())
    }

    /// Replays every record from `reader`, writing one id per line to `writer`.
    ///
    /// Stops at the first malformed record or unknown delete. Errors from a
    /// delete carry the record's physical line, blank lines included.
    ///
    /// # Errors
    ///
    /// [`MalformedRecord`](crate::OracleError::MalformedRecord),
    /// [`NotFound`](crate::OracleError::NotFound), or an I/O error from either
    /// side of the stream.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<ReplayStats> {
        let mut results = Vec::new();

        for (index, record) in Records::new(reader).enumerate() {
            let (line, operation) = record?;
            results.clear();
            self.apply(index, &operation, &mut results)
                .map_err(|e| e.at_operation(index, line))?;
            for id in &results {
                writeln!(writer, "{}", id)?;
            }

            if index % PROGRESS_INTERVAL == 0 {
                debug!(operations = index, objects = self.store.len(), "progress");
            }
        }
        writer.flush()?;

        info!(
            operations = self.stats.operations,
            inserts = self.stats.inserts,
            deletes = self.stats.deletes,
            queries = self.stats.queries,
            results = self.stats.results,
            mode = %self.config.mode,
            "Replay finished"
        );
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::geometry::Rect;

    #[test]
    fn test_apply_counts_operations() {
        let mut replay = Replay::new(ReplayConfig::intersection());
        let mut results = Vec::new();
        let rect = Rect::from_xy(0.0, 0.0, 1.0, 1.0);

        replay.apply(0, &Operation::insert(1, &rect), &mut results).unwrap();
        replay.apply(1, &Operation::query(9, &rect), &mut results).unwrap();
        replay.apply(2, &Operation::delete(1, &rect), &mut results).unwrap();

        let stats = replay.stats();
        assert_eq!(stats.operations, 3);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.queries, 1);
        assert_eq!(stats.results, 1);
        assert_eq!(results, vec![1]);
        assert!(replay.store().is_empty());
    }

    #[test]
    fn test_apply_unknown_delete_reports_index() {
        let mut replay = Replay::new(ReplayConfig::intersection());
        let mut results = Vec::new();
        let rect = Rect::from_xy(0.0, 0.0, 1.0, 1.0);

        match replay.apply(12, &Operation::delete(4, &rect), &mut results) {
            Err(OracleError::NotFound { op_index, line, id }) => {
                assert_eq!(op_index, 12);
                assert_eq!(line, 13);
                assert_eq!(id, 4);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(replay.stats().operations, 0);
    }

    #[test]
    fn test_run_unknown_delete_reports_physical_line() {
        let mut replay = Replay::new(ReplayConfig::intersection());
        let workload = "1 0 0 0 1 1\n\n\n\n0 3 0 0 1 1\n";
        let mut out = Vec::new();

        match replay.run(workload.as_bytes(), &mut out) {
            Err(OracleError::NotFound { op_index, line, id }) => {
                assert_eq!(op_index, 1, "second record of the stream");
                assert_eq!(line, 5, "blank lines still count toward the line");
                assert_eq!(id, 3);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(replay.stats().operations, 1);
    }

    #[test]
    fn test_query_for_uses_mode() {
        let op = Operation::parse("2 9 3.0 4.0 1.0 2.0", 1).unwrap().unwrap();

        let replay = Replay::new(ReplayConfig::intersection());
        assert_eq!(replay.query_for(&op), Query::Intersection(Rect::from_xy(1.0, 2.0, 3.0, 4.0)));

        let replay = Replay::new(ReplayConfig::nearest(10));
        match replay.query_for(&op) {
            Query::Nearest { point, k } => {
                // Anchored at the first corner as written, not the normalized min
                assert_eq!(point.coords(), &[3.0, 4.0]);
                assert_eq!(k, 10);
            }
            other => panic!("expected nearest query, got {:?}", other),
        }
    }
}
