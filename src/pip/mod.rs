//! Point-in-Polygon (PIP) zone lookup.
//!
//! Tests query points against delivery zone rings and selects the first
//! matching zone in dataset order, either by linear scan or through an
//! R-tree envelope prefilter.

mod geometry;
mod index;
mod service;

pub use geometry::{contains, ring_contains};
pub use index::ZoneIndex;
pub use service::{resolve, ZoneResolver};
