//! Spatial index for zone lookups over large datasets.

use geo::BoundingRect;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use super::geometry::contains;
use crate::error::ZoneError;
use crate::models::{Coordinate, ZoneRecord};

/// Envelope entry pointing back at a zone by its dataset position
#[derive(Debug, Clone)]
struct IndexedZone {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over zone envelopes.
///
/// Lookups return the same zone as a linear first-match scan: all envelope
/// candidates that contain the point are collected and the one listed
/// earliest in the dataset wins.
pub struct ZoneIndex {
    zones: Vec<ZoneRecord>,
    tree: RTree<IndexedZone>,
}

impl ZoneIndex {
    /// Build the index, keeping zones in their dataset order
    pub fn build(zones: Vec<ZoneRecord>) -> Self {
        let indexed: Vec<IndexedZone> = zones
            .iter()
            .enumerate()
            .filter_map(|(ordinal, zone)| {
                let rect = zone.polygon.bounding_rect()?;
                Some(IndexedZone {
                    ordinal,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        let tree = RTree::bulk_load(indexed);
        debug!("Zone index built with {} entries", tree.size());

        Self { zones, tree }
    }

    /// First zone in dataset order whose ring contains the point
    pub fn resolve(&self, point: &Coordinate) -> Result<&ZoneRecord, ZoneError> {
        let coord = point.as_coord();
        let query_envelope = AABB::from_point([coord.x, coord.y]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|iz| contains(&self.zones[iz.ordinal].polygon, point))
            .map(|iz| iz.ordinal)
            .min()
            .map(|ordinal| &self.zones[ordinal])
            .ok_or(ZoneError::NoMatchingZone)
    }

    /// Zones in dataset order
    pub fn zones(&self) -> &[ZoneRecord] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
