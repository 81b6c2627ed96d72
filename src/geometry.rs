//! Axis-aligned rectangles and points in a fixed number of dimensions.
//!
//! A [`Rect`] is normalized when it is built: for every dimension `min <= max`,
//! whichever order the two corners were given in. Rectangles are never mutated
//! afterwards; moving an object means replacing its rectangle.

use std::array;

/// Query anchor for nearest-neighbor queries
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<const D: usize = 2> {
    coords: [f64; D],
}

impl<const D: usize> Point<D> {
    /// Point at `coords`
    pub fn new(coords: [f64; D]) -> Self {
        Self { coords }
    }

    /// Coordinates, one per dimension
    pub fn coords(&self) -> &[f64; D] {
        &self.coords
    }
}

impl Point<2> {
    /// 2D point at `(x, y)`
    pub fn xy(x: f64, y: f64) -> Self {
        Self::new([x, y])
    }
}

impl<const D: usize> From<[f64; D]> for Point<D> {
    fn from(coords: [f64; D]) -> Self {
        Self::new(coords)
    }
}

/// Axis-aligned rectangle (minimum bounding rectangle of an object)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect<const D: usize = 2> {
    min: [f64; D],
    max: [f64; D],
}

impl<const D: usize> Rect<D> {
    /// Builds a rectangle from two arbitrary opposite corners.
    ///
    /// # Examples
    /// ```
    /// use aabb_oracle::Rect;
    ///
    /// let r = Rect::new([3.0, 0.0], [1.0, 2.0]);
    /// assert_eq!(r.min(), &[1.0, 0.0]);
    /// assert_eq!(r.max(), &[3.0, 2.0]);
    /// ```
    pub fn new(a: [f64; D], b: [f64; D]) -> Self {
        Self {
            min: array::from_fn(|d| if a[d] < b[d] { a[d] } else { b[d] }),
            max: array::from_fn(|d| if a[d] > b[d] { a[d] } else { b[d] }),
        }
    }

    /// Degenerate rectangle covering a single point
    pub fn from_point(point: &Point<D>) -> Self {
        Self {
            min: point.coords,
            max: point.coords,
        }
    }

    /// Lower corner
    pub fn min(&self) -> &[f64; D] {
        &self.min
    }

    /// Upper corner
    pub fn max(&self) -> &[f64; D] {
        &self.max
    }

    /// Closed-interval overlap test in every dimension; touching edges intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|d| !(self.min[d] > other.max[d] || self.max[d] < other.min[d]))
    }

    /// Squared Euclidean distance from `point` to the nearest point on or inside
    /// the rectangle. Zero when the point is inside or on the boundary.
    pub fn min_squared_distance(&self, point: &Point<D>) -> f64 {
        (0..D)
            .map(|d| {
                let p = point.coords[d];
                let delta = if p > self.max[d] {
                    p - self.max[d]
                } else if p < self.min[d] {
                    self.min[d] - p
                } else {
                    0.0
                };
                delta * delta
            })
            .sum()
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains_point(&self, point: &Point<D>) -> bool {
        (0..D).all(|d| self.min[d] <= point.coords[d] && point.coords[d] <= self.max[d])
    }
}

impl Rect<2> {
    /// Builds a 2D rectangle from corners `(x1, y1)` and `(x2, y2)`, in any order
    pub fn from_xy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new([x1, y1], [x2, y2])
    }
}

/// Free-function form of [`Rect::intersects`]
#[inline]
pub fn intersects<const D: usize>(a: &Rect<D>, b: &Rect<D>) -> bool {
    a.intersects(b)
}

/// Free-function form of [`Rect::min_squared_distance`]
#[inline]
pub fn min_squared_distance<const D: usize>(rect: &Rect<D>, point: &Point<D>) -> f64 {
    rect.min_squared_distance(point)
}
