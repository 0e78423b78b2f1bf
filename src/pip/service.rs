//! First-match zone resolution.

use tracing::debug;

use super::geometry::contains;
use crate::error::ZoneError;
use crate::models::{Coordinate, ZoneRecord};

/// First zone in sequence order whose ring contains the point.
///
/// Overlapping zones are not an error; the earlier listed zone wins.
pub fn resolve<'a>(zones: &'a [ZoneRecord], point: &Coordinate) -> Result<&'a ZoneRecord, ZoneError> {
    let matched = zones
        .iter()
        .find(|zone| contains(&zone.polygon, point))
        .ok_or(ZoneError::NoMatchingZone)?;

    debug!(
        "Point ({}, {}) matched zone '{}'",
        point.lat, point.lon, matched.title
    );

    Ok(matched)
}

/// Zone lookup over a decoded dataset
pub struct ZoneResolver {
    zones: Vec<ZoneRecord>,
}

impl ZoneResolver {
    pub fn new(zones: Vec<ZoneRecord>) -> Self {
        Self { zones }
    }

    pub fn resolve(&self, point: &Coordinate) -> Result<&ZoneRecord, ZoneError> {
        resolve(&self.zones, point)
    }

    pub fn zones(&self) -> &[ZoneRecord] {
        &self.zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation;
    use geo::LineString;

    fn zone(title: &str, ring: Vec<(f64, f64)>) -> ZoneRecord {
        ZoneRecord {
            title: title.to_string(),
            annotation: annotation::parse(title),
            polygon: LineString::from(ring),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let a = zone("A", vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let b = zone("B", vec![(2.0, 2.0), (2.0, 8.0), (8.0, 8.0), (8.0, 2.0)]);
        let point = Coordinate::new(5.0, 5.0);

        let zones = vec![a.clone(), b.clone()];
        assert_eq!(resolve(&zones, &point).unwrap().title, "A");

        let zones = vec![b, a];
        assert_eq!(resolve(&zones, &point).unwrap().title, "B");
    }

    #[test]
    fn test_skips_non_matching() {
        let resolver = ZoneResolver::new(vec![
            zone("West", vec![(0.0, 0.0), (0.0, 5.0), (5.0, 5.0), (5.0, 0.0)]),
            zone("East", vec![(5.0, 0.0), (5.0, 5.0), (10.0, 5.0), (10.0, 0.0)]),
        ]);
        assert_eq!(resolver.resolve(&Coordinate::new(7.0, 2.0)).unwrap().title, "East");
        assert_eq!(resolver.zones().len(), 2);
    }

    #[test]
    fn test_no_matching_zone() {
        let zones = vec![zone("A", vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)])];
        assert_eq!(
            resolve(&zones, &Coordinate::new(100.0, 100.0)).unwrap_err(),
            ZoneError::NoMatchingZone
        );
        assert_eq!(
            resolve(&[], &Coordinate::new(0.0, 0.0)).unwrap_err(),
            ZoneError::NoMatchingZone
        );
    }
}
