//! Crossing-number point-in-polygon test.
//!
//! A horizontal ray is cast from the query point towards increasing x and
//! every ring edge it crosses is counted. The ring is treated as implicitly
//! closed, so a repeated first vertex at the end is harmless.
//!
//! Boundary convention: an edge counts when exactly one of its endpoints lies
//! strictly above the ray (`y > py`), and the crossing lies strictly to the
//! right of the point (`px < x_cross`). The result is that points on a
//! left or bottom edge of an axis-aligned rectangle test as inside, and
//! points on a right or top edge test as outside. Vertices follow the same
//! half-open rule. The outcome depends only on the inputs.

use geo::{Coord, LineString};

use crate::models::Coordinate;

/// Whether a zone ring contains the query point
pub fn contains(ring: &LineString<f64>, point: &Coordinate) -> bool {
    ring_contains(ring, point.as_coord())
}

/// Crossing-number test of a single ring
pub fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let vertices = &ring.0;
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];

        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
