//! Line-oriented operation records: `op id x1 y1 x2 y2`.
//!
//! `op` is `0` (delete), `1` (insert or replace) or `2` (query). All three carry
//! six whitespace-separated fields; the coordinates of a delete are validated
//! but otherwise unused. Blank lines are skipped but still counted.

use std::fmt;
use std::io::BufRead;

use crate::error::{OracleError, Result};
use crate::geometry::{Point, Rect};
use crate::store::ObjectId;

const FIELD_COUNT: usize = 6;

/// The `op` field of a record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum OpCode {
    /// `0`: remove the id from the store
    Delete,
    /// `1`: insert the id, or replace its rectangle
    Insert,
    /// `2`: run one query in the configured mode
    Query,
}

impl OpCode {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Delete),
            1 => Some(Self::Insert),
            2 => Some(Self::Query),
            _ => None,
        }
    }

    /// Numeric code as written in a record
    pub fn code(self) -> u8 {
        match self {
            Self::Delete => 0,
            Self::Insert => 1,
            Self::Query => 2,
        }
    }
}

/// One record of the workload stream.
///
/// Corners are kept as written: a nearest-neighbor query is anchored at the
/// first corner `(x1, y1)`, which normalization would lose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Operation {
    /// What to do
    pub op: OpCode,
    /// Object id; ignored for queries
    pub id: ObjectId,
    /// Corner `(x1, y1)`
    pub first: [f64; 2],
    /// Corner `(x2, y2)`
    pub second: [f64; 2],
}

impl Operation {
    /// Record with `rect`'s minimum corner first
    pub fn new(op: OpCode, id: ObjectId, rect: &Rect) -> Self {
        Self {
            op,
            id,
            first: *rect.min(),
            second: *rect.max(),
        }
    }

    /// Insert record
    pub fn insert(id: ObjectId, rect: &Rect) -> Self {
        Self::new(OpCode::Insert, id, rect)
    }

    /// Delete record
    pub fn delete(id: ObjectId, rect: &Rect) -> Self {
        Self::new(OpCode::Delete, id, rect)
    }

    /// Query record
    pub fn query(id: ObjectId, rect: &Rect) -> Self {
        Self::new(OpCode::Query, id, rect)
    }

    /// Rectangle normalized from the two corners
    pub fn rect(&self) -> Rect {
        Rect::new(self.first, self.second)
    }

    /// Nearest-neighbor anchor: the first corner as written
    pub fn anchor(&self) -> Point {
        Point::new(self.first)
    }

    /// Parses one line. Returns `Ok(None)` for a blank line.
    ///
    /// `line` is the 1-based line number used in error reports.
    ///
    /// # Errors
    ///
    /// [`OracleError::MalformedRecord`] on a wrong field count, an op code
    /// other than 0, 1 or 2, a non-integer id, or a non-numeric coordinate.
    pub fn parse(text: &str, line: usize) -> Result<Option<Self>> {
        let fields: Vec<&str> = text.split_ascii_whitespace().collect();
        if fields.is_empty() {
            return Ok(None);
        }
        if fields.len() != FIELD_COUNT {
            return Err(OracleError::malformed(
                line,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }

        let op = fields[0]
            .parse::<u8>()
            .ok()
            .and_then(OpCode::from_code)
            .ok_or_else(|| OracleError::malformed(line, format!("invalid op code '{}'", fields[0])))?;
        let id = fields[1]
            .parse::<ObjectId>()
            .map_err(|_| OracleError::malformed(line, format!("invalid id '{}'", fields[1])))?;

        let mut coords = [0.0_f64; 4];
        for (slot, field) in coords.iter_mut().zip(&fields[2..]) {
            *slot = field
                .parse::<f64>()
                .map_err(|_| OracleError::malformed(line, format!("invalid coordinate '{}'", field)))?;
        }

        Ok(Some(Self {
            op,
            id,
            first: [coords[0], coords[1]],
            second: [coords[2], coords[3]],
        }))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.op.code(),
            self.id,
            self.first[0],
            self.first[1],
            self.second[0],
            self.second[1]
        )
    }
}

/// Reads operations from a buffered reader, skipping blank lines.
///
/// Yields `(line_number, operation)`; line numbers are 1-based.
#[derive(Debug)]
pub struct Records<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> Records<R> {
    /// Starts reading at line 1 of `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<(usize, Operation)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;
            match Operation::parse(&self.buf, self.line) {
                Ok(Some(op)) => return Some(Ok((self.line, op))),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
