//! Zone dataset decoding.
//!
//! A map dataset is a JSON document whose first element carries a
//! `delivery_areas` list:
//!
//! ```json
//! [{
//!   "delivery_areas": [{
//!     "area_coordinates": [[[55.75, 37.61], [55.76, 37.62], [55.74, 37.63]]],
//!     "settings": { "title": "Center price: 500 period: 2-4" }
//!   }]
//! }]
//! ```
//!
//! Each area becomes one [`ZoneRecord`] using only its first coordinate ring.

use geo::{Coord, LineString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::annotation;
use crate::error::ZoneError;
use crate::models::ZoneRecord;

/// Minimum number of vertices for a usable ring
pub const MIN_RING_VERTICES: usize = 3;

/// Decode a raw dataset into zones, preserving dataset order
pub fn decode(raw: &str) -> Result<Vec<ZoneRecord>, ZoneError> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| ZoneError::MalformedDataset(format!("invalid json: {}", e)))?;

    decode_value(&data)
}

/// Decode an already parsed dataset document
pub fn decode_value(data: &Value) -> Result<Vec<ZoneRecord>, ZoneError> {
    let head = match data {
        Value::Array(items) => items.first(),
        Value::Object(map) => map.get("0"),
        _ => None,
    };

    let areas = head
        .and_then(|h| h.get("delivery_areas"))
        .and_then(Value::as_array)
        .ok_or_else(|| ZoneError::MalformedDataset("delivery_areas".to_string()))?;

    let mut zones = Vec::with_capacity(areas.len());

    for (position, area) in areas.iter().enumerate() {
        match decode_area(area) {
            Some(zone) => zones.push(zone),
            None => debug!("Skipping delivery area #{}", position),
        }
    }

    debug!("Decoded {} of {} delivery areas", zones.len(), areas.len());

    Ok(zones)
}

/// One delivery area, or `None` when it has no usable ring or title.
/// A title of `""` or `"0"` counts as unset.
fn decode_area(area: &Value) -> Option<ZoneRecord> {
    let ring = area
        .get("area_coordinates")
        .and_then(|rings| rings.get(0))
        .and_then(Value::as_array)
        .filter(|ring| !ring.is_empty())?;

    let title = area
        .get("settings")
        .and_then(|s| s.get("title"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty() && *t != "0")?;

    let polygon = match decode_ring(ring) {
        Some(polygon) => polygon,
        None => {
            warn!("Delivery area '{}' has an unusable ring, skipping", title);
            return None;
        }
    };

    Some(ZoneRecord {
        title: title.to_string(),
        annotation: annotation::parse(title),
        polygon,
    })
}

/// Vertex list in dataset order. Every vertex must be a numeric pair.
fn decode_ring(ring: &[Value]) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .map(decode_vertex)
        .collect::<Option<Vec<_>>>()?;

    if coords.len() < MIN_RING_VERTICES {
        return None;
    }

    Some(LineString::new(coords))
}

fn decode_vertex(vertex: &Value) -> Option<Coord<f64>> {
    let pair = vertex.as_array()?;
    let x = number(pair.first()?)?;
    let y = number(pair.get(1)?)?;
    Some(Coord { x, y })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
