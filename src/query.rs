//! Exhaustive query evaluation over a store snapshot.
//!
//! Every query scans the whole snapshot. Intersection is a pure predicate;
//! nearest-neighbor sorts every object by squared distance and extends the
//! answer past `k` to absorb exact ties with the k-th distance, so that an
//! index returning any subset of those ties can still be checked.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::geometry::{Point, Rect};
use crate::store::{ObjectId, Snapshot};

/// A transient query, evaluated once against the current snapshot
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Query<const D: usize = 2> {
    /// Every object whose rectangle meets this one
    Intersection(Rect<D>),
    /// The `k` objects closest to `point`, plus ties at the k-th distance
    Nearest {
        /// Query anchor
        point: Point<D>,
        /// Neighbor count before tie extension
        k: usize,
    },
}

/// Object id paired with its squared distance to the query point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NnEntry {
    /// Object id
    pub id: ObjectId,
    /// Squared distance from the query point
    pub dist: f64,
}

impl NnEntry {
    /// Pairs `id` with its squared distance
    pub fn new(id: ObjectId, dist: f64) -> Self {
        Self { id, dist }
    }

    #[inline]
    fn cmp_dist(&self, other: &Self) -> Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

/// Queries for all objects intersecting `rect`
///
/// Results are appended to the output vector (not cleared first), in snapshot
/// iteration order.
///
/// # Examples
/// ```
/// use aabb_oracle::prelude::*;
///
/// let mut store = ObjectStore::new();
/// store.insert(0, Rect::from_xy(0.0, 0.0, 1.0, 1.0));
/// store.insert(1, Rect::from_xy(5.0, 5.0, 6.0, 6.0));
///
/// let mut results = Vec::new();
/// query_intersecting(store.snapshot(), &Rect::from_xy(0.0, 0.0, 2.0, 2.0), &mut results);
/// assert_eq!(results, vec![0]);
/// ```
pub fn query_intersecting<const D: usize>(
    snapshot: Snapshot<'_, D>,
    rect: &Rect<D>,
    results: &mut Vec<ObjectId>,
) {
    results.extend(
        snapshot
            .iter()
            .filter(|(_, object)| object.intersects(rect))
            .map(|(id, _)| id),
    );
}

/// Scores every object in the snapshot and sorts ascending by distance.
///
/// The sort is stable; the order among exact ties is whatever the snapshot
/// iteration produced.
pub fn sorted_entries<const D: usize>(snapshot: Snapshot<'_, D>, point: &Point<D>) -> Vec<NnEntry> {
    let mut queue: Vec<NnEntry> = snapshot
        .iter()
        .map(|(id, rect)| NnEntry::new(id, rect.min_squared_distance(point)))
        .collect();
    queue.sort_by(NnEntry::cmp_dist);
    queue
}

/// Length of the tie-extended prefix of `sorted` for a k-nearest answer.
///
/// Entries are taken unconditionally until `k` have been taken; after that,
/// only entries whose distance equals the last taken distance. Zero when
/// `k == 0`.
pub fn tie_extended_len(sorted: &[NnEntry], k: usize) -> usize {
    if k == 0 {
        return 0;
    }

    let mut count = 0;
    let mut knearest = 0.0;
    for entry in sorted {
        if count >= k && entry.dist > knearest {
            break;
        }
        count += 1;
        knearest = entry.dist;
    }
    count
}

/// Nearest entries with distances: the `k` closest, plus every entry tied with
/// the k-th distance
pub fn nearest_k_entries<const D: usize>(
    snapshot: Snapshot<'_, D>,
    point: &Point<D>,
    k: usize,
) -> Vec<NnEntry> {
    if k == 0 || snapshot.is_empty() {
        return Vec::new();
    }
    let mut queue = sorted_entries(snapshot, point);
    let len = tie_extended_len(&queue, k);
    queue.truncate(len);
    queue
}

/// Queries for the K nearest objects to a point, extended with ties at the cutoff
///
/// Results are appended to the output vector (not cleared first), sorted by
/// distance (closest first). The answer holds exactly `k` ids unless the k-th
/// distance is shared by later objects, in which case all of them are included.
/// If the store holds fewer than `k` objects, all of them are returned.
///
/// # Examples
/// ```
/// use aabb_oracle::prelude::*;
///
/// let mut store = ObjectStore::new();
/// store.insert(0, Rect::from_xy(1.0, 0.0, 1.0, 0.0)); // squared distance 1
/// store.insert(1, Rect::from_xy(0.0, 2.0, 0.0, 2.0)); // 4
/// store.insert(2, Rect::from_xy(-2.0, 0.0, -2.0, 0.0)); // 4
/// store.insert(3, Rect::from_xy(3.0, 0.0, 3.0, 0.0)); // 9
///
/// let mut results = Vec::new();
/// query_nearest_k(store.snapshot(), &Point::xy(0.0, 0.0), 2, &mut results);
/// results.sort();
/// assert_eq!(results, vec![0, 1, 2]);
/// ```
pub fn query_nearest_k<const D: usize>(
    snapshot: Snapshot<'_, D>,
    point: &Point<D>,
    k: usize,
    results: &mut Vec<ObjectId>,
) {
    results.extend(nearest_k_entries(snapshot, point, k).into_iter().map(|entry| entry.id));
}

/// Evaluates `query` against the snapshot, appending matching ids to `results`
pub fn evaluate<const D: usize>(snapshot: Snapshot<'_, D>, query: &Query<D>, results: &mut Vec<ObjectId>) {
    match query {
        Query::Intersection(rect) => query_intersecting(snapshot, rect, results),
        Query::Nearest { point, k } => query_nearest_k(snapshot, point, *k, results),
    }
}

/// Checks an answer from an index under test against the oracle's tie-extended
/// nearest entries for the same query.
///
/// Accepted answers hold no duplicates, only ids from `expected`, every id
/// strictly closer than the k-th distance, and at least `min(k, expected.len())`
/// ids. So both "exactly k" and "k plus ties" pass.
pub fn accepts_nearest_answer(expected: &[NnEntry], k: usize, answer: &[ObjectId]) -> bool {
    let required = k.min(expected.len());
    if answer.len() < required || answer.len() > expected.len() {
        return false;
    }

    let mut seen = HashSet::with_capacity(answer.len());
    if !answer.iter().all(|id| seen.insert(*id)) {
        return false;
    }

    let allowed: HashSet<ObjectId> = expected.iter().map(|entry| entry.id).collect();
    if !seen.iter().all(|id| allowed.contains(id)) {
        return false;
    }

    let Some(cutoff) = expected.get(required.saturating_sub(1)).map(|entry| entry.dist) else {
        return answer.is_empty();
    };
    expected
        .iter()
        .filter(|entry| entry.dist < cutoff)
        .all(|entry| seen.contains(&entry.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dists: &[f64]) -> Vec<NnEntry> {
        dists
            .iter()
            .enumerate()
            .map(|(i, &d)| NnEntry::new(i as ObjectId, d))
            .collect()
    }

    #[test]
    fn test_tie_extended_len_no_ties() {
        let sorted = entries(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(tie_extended_len(&sorted, 1), 1);
        assert_eq!(tie_extended_len(&sorted, 3), 3);
        assert_eq!(tie_extended_len(&sorted, 5), 5);
    }

    #[test]
    fn test_tie_extended_len_ties_at_cutoff() {
        let sorted = entries(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(tie_extended_len(&sorted, 2), 3);
        assert_eq!(tie_extended_len(&sorted, 3), 3);
        assert_eq!(tie_extended_len(&sorted, 1), 1);
    }

    #[test]
    fn test_tie_extended_len_ties_before_cutoff_are_not_extended() {
        // Ties strictly inside the answer do not grow it
        let sorted = entries(&[1.0, 1.0, 2.0, 3.0]);
        assert_eq!(tie_extended_len(&sorted, 3), 3);
    }

    #[test]
    fn test_tie_extended_len_all_equal() {
        let sorted = entries(&[5.0; 6]);
        assert_eq!(tie_extended_len(&sorted, 1), 6);
    }

    #[test]
    fn test_tie_extended_len_zero_distance_ties() {
        // knearest starts at 0.0; zero-distance entries beyond k are ties too
        let sorted = entries(&[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(tie_extended_len(&sorted, 1), 3);
    }

    #[test]
    fn test_tie_extended_len_k_zero_or_short_input() {
        let sorted = entries(&[1.0, 2.0]);
        assert_eq!(tie_extended_len(&sorted, 0), 0);
        assert_eq!(tie_extended_len(&sorted, 10), 2);
        assert_eq!(tie_extended_len(&[], 3), 0);
    }

    #[test]
    fn test_accepts_exact_and_tie_extended() {
        let expected = entries(&[1.0, 2.0, 2.0]);
        assert!(accepts_nearest_answer(&expected, 2, &[0, 1]));
        assert!(accepts_nearest_answer(&expected, 2, &[0, 2]));
        assert!(accepts_nearest_answer(&expected, 2, &[2, 0, 1]));
    }

    #[test]
    fn test_rejects_bad_answers() {
        let expected = entries(&[1.0, 2.0, 2.0]);
        // Missing the strictly closer object
        assert!(!accepts_nearest_answer(&expected, 2, &[1, 2]));
        // Too short
        assert!(!accepts_nearest_answer(&expected, 2, &[0]));
        // Duplicate
        assert!(!accepts_nearest_answer(&expected, 2, &[0, 0]));
        // Unknown id
        assert!(!accepts_nearest_answer(&expected, 2, &[0, 42]));
    }

    #[test]
    fn test_accepts_empty_for_empty() {
        assert!(accepts_nearest_answer(&[], 3, &[]));
        assert!(!accepts_nearest_answer(&[], 3, &[1]));
    }
}
