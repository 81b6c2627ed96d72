//! Random workload generator for regression runs.
//!
//! Produces a stream of inserts, moves (delete + re-insert) and queries over
//! the unit square. Every delete names a live id together with its current
//! rectangle, so the output always replays cleanly.

use std::io::Write;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{OracleError, Result};
use crate::geometry::Rect;
use crate::record::Operation;
use crate::store::ObjectId;

/// Id written on query records; the oracle ignores it
pub const QUERY_ID: ObjectId = 9_999_999;

/// Shape of a generated workload
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Number of objects inserted up front, with ids `0..objects`
    pub objects: usize,
    /// Number of move-then-query rounds
    pub rounds: usize,
    /// Share of objects moved per round
    pub move_fraction: f64,
    /// Side length of each query rectangle
    pub query_extent: f64,
    /// Fixed seed for reproducible workloads; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// `objects` inserts, then 100 rounds moving 10% of them, with 0.01 queries
    pub fn new(objects: usize) -> Self {
        Self {
            objects,
            rounds: 100,
            move_fraction: 0.1,
            query_extent: 0.01,
            seed: None,
        }
    }

    /// Fixes the seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of rounds
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.objects == 0 {
            return Err(OracleError::InvalidConfig(
                "number of objects must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.move_fraction) {
            return Err(OracleError::InvalidConfig(format!(
                "move fraction {} outside [0, 1]",
                self.move_fraction
            )));
        }
        if !self.query_extent.is_finite() || self.query_extent < 0.0 {
            return Err(OracleError::InvalidConfig(format!(
                "query extent {} must be finite and non-negative",
                self.query_extent
            )));
        }
        Ok(())
    }

    /// Objects moved in each round
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the cast saturates and the fraction is at most 1"
    )]
    pub fn moves_per_round(&self) -> usize {
        (self.objects as f64 * self.move_fraction).floor() as usize
    }
}

/// Stateful generator; call [`Generator::generate`] once per workload
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    /// Validates `config` and seeds the RNG
    ///
    /// # Errors
    ///
    /// [`OracleError::InvalidConfig`] for zero objects, a move fraction
    /// outside `[0, 1]`, or a negative or non-finite query extent.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { config, rng })
    }

    fn random_rect(&mut self) -> Rect {
        Rect::from_xy(
            self.rng.random(),
            self.rng.random(),
            self.rng.random(),
            self.rng.random(),
        )
    }

    /// Generates the full workload, calling `emit` for each operation in order
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from `emit`.
    pub fn generate<F>(&mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(Operation) -> Result<()>,
    {
        let objects = self.config.objects;
        let moves = self.config.moves_per_round();
        let extent = self.config.query_extent;

        let mut current: Vec<Rect> = Vec::with_capacity(objects);
        for id in 0..objects {
            let rect = self.random_rect();
            current.push(rect);
            emit(Operation::insert(id as ObjectId, &rect))?;
        }

        for round in (1..=self.config.rounds).rev() {
            debug!(round, "generating round");
            let moved = index::sample(&mut self.rng, objects, moves);
            for slot in moved.iter() {
                let id = slot as ObjectId;
                emit(Operation::delete(id, &current[slot]))?;
                let rect = self.random_rect();
                current[slot] = rect;
                emit(Operation::insert(id, &rect))?;
            }

            let x: f64 = self.rng.random();
            let y: f64 = self.rng.random();
            emit(Operation::query(QUERY_ID, &Rect::from_xy(x, y, x + extent, y + extent)))?;
        }
        Ok(())
    }

    /// Generates the workload into memory
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Generator::generate`].
    pub fn operations(&mut self) -> Result<Vec<Operation>> {
        let mut out = Vec::new();
        self.generate(|op| {
            out.push(op);
            Ok(())
        })?;
        Ok(out)
    }

    /// Writes the workload as records, one per line. Returns the record count.
    ///
    /// # Errors
    ///
    /// [`OracleError::Io`] if writing fails.
    pub fn write_to<W: Write>(&mut self, mut writer: W) -> Result<usize> {
        let mut count = 0;
        self.generate(|op| {
            writeln!(writer, "{}", op)?;
            count += 1;
            Ok(())
        })?;
        writer.flush()?;
        info!(records = count, objects = self.config.objects, rounds = self.config.rounds, "Workload generated");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OpCode;
    use std::collections::HashMap;

    #[test]
    fn test_rejects_empty_workload() {
        assert!(matches!(
            Generator::new(GeneratorConfig::new(0)),
            Err(OracleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_fraction() {
        let mut config = GeneratorConfig::new(10);
        config.move_fraction = 1.5;
        assert!(Generator::new(config).is_err());
    }

    #[test]
    fn test_operation_counts() {
        let config = GeneratorConfig::new(50).with_seed(1).with_rounds(4);
        let ops = Generator::new(config).unwrap().operations().unwrap();

        let inserts = ops.iter().filter(|op| op.op == OpCode::Insert).count();
        let deletes = ops.iter().filter(|op| op.op == OpCode::Delete).count();
        let queries = ops.iter().filter(|op| op.op == OpCode::Query).count();
        // 50 initial inserts, 5 moves per round
        assert_eq!(inserts, 50 + 4 * 5);
        assert_eq!(deletes, 4 * 5);
        assert_eq!(queries, 4);
        assert!(ops.iter().filter(|op| op.op == OpCode::Query).all(|op| op.id == QUERY_ID));
    }

    #[test]
    fn test_same_seed_same_workload() {
        let a = Generator::new(GeneratorConfig::new(30).with_seed(99).with_rounds(3))
            .unwrap()
            .operations()
            .unwrap();
        let b = Generator::new(GeneratorConfig::new(30).with_seed(99).with_rounds(3))
            .unwrap()
            .operations()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deletes_name_live_rectangles() {
        let ops = Generator::new(GeneratorConfig::new(40).with_seed(5).with_rounds(10))
            .unwrap()
            .operations()
            .unwrap();

        let mut live: HashMap<ObjectId, Rect> = HashMap::new();
        for op in &ops {
            match op.op {
                OpCode::Insert => {
                    let _ = live.insert(op.id, op.rect());
                }
                OpCode::Delete => {
                    let rect = live.remove(&op.id).expect("delete of a live id");
                    assert_eq!(rect, op.rect(), "delete carries the current rectangle");
                }
                OpCode::Query => {}
            }
        }
        assert_eq!(live.len(), 40);
    }

    #[test]
    fn test_moves_within_round_are_distinct() {
        let config = GeneratorConfig::new(20).with_seed(11).with_rounds(1);
        let ops = Generator::new(config).unwrap().operations().unwrap();
        let mut deleted: Vec<ObjectId> = ops
            .iter()
            .filter(|op| op.op == OpCode::Delete)
            .map(|op| op.id)
            .collect();
        let total = deleted.len();
        deleted.sort();
        deleted.dedup();
        assert_eq!(deleted.len(), total);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_queries_have_configured_extent() {
        let ops = Generator::new(GeneratorConfig::new(10).with_seed(2).with_rounds(5))
            .unwrap()
            .operations()
            .unwrap();
        for op in ops.iter().filter(|op| op.op == OpCode::Query) {
            let rect = op.rect();
            assert!((rect.max()[0] - rect.min()[0] - 0.01).abs() < 1e-12);
            assert!((rect.max()[1] - rect.min()[1] - 0.01).abs() < 1e-12);
        }
    }

    #[test]
    fn test_write_to_emits_parseable_lines() {
        let mut buf = Vec::new();
        let count = Generator::new(GeneratorConfig::new(5).with_seed(3).with_rounds(2))
            .unwrap()
            .write_to(&mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), count);
        for (i, line) in text.lines().enumerate() {
            assert!(Operation::parse(line, i + 1).unwrap().is_some());
        }
    }
}
