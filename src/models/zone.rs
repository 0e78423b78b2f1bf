//! Delivery zone types produced by the dataset decoder.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// Query point for zone matching (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Position in ring space. Vertices are stored as `[lat, lon]` pairs,
    /// so latitude is x and longitude is y.
    pub fn as_coord(&self) -> Coord<f64> {
        Coord {
            x: self.lat,
            y: self.lon,
        }
    }
}

/// Delivery period parsed from a zone title, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

/// Pricing metadata embedded in a zone title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

/// A single usable delivery zone
#[derive(Debug, Clone)]
pub struct ZoneRecord {
    /// Title exactly as it appears in the dataset
    pub title: String,
    pub annotation: ZoneAnnotation,
    /// Outer ring, at least 3 vertices, not necessarily closed
    pub polygon: LineString<f64>,
}

impl ZoneRecord {
    pub fn price(&self) -> Option<i64> {
        self.annotation.price
    }

    pub fn period(&self) -> Option<Period> {
        self.annotation.period
    }
}
