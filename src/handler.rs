//! Delivery handler: the end-to-end pricing request.
//!
//! A request runs coordinate extraction, dataset fetch, decoding, zone
//! matching and price resolution in that order. The first failure ends the
//! request; nothing is retried and nothing is partially applied.

use hashbrown::HashMap;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::ZoneCatalog;
use crate::config::HandlerConfig;
use crate::dataset;
use crate::error::ZoneError;
use crate::models::{Coordinate, ResolvedPricing, ZoneRecord};
use crate::order::{extract_coordinate, OrderProperties};
use crate::pip::{self, ZoneIndex};
use crate::pricing::resolve_pricing;

/// Error attached to a failed calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationError {
    pub message: String,
    pub code: &'static str,
}

impl From<&ZoneError> for CalculationError {
    fn from(err: &ZoneError) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
        }
    }
}

/// Outcome of a price calculation as handed to the shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    Priced {
        price: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        period_from: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        period_to: Option<i64>,
    },
    Failed {
        error: CalculationError,
    },
}

impl CalculationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CalculationResult::Priced { .. })
    }

    pub fn error(&self) -> Option<&CalculationError> {
        match self {
            CalculationResult::Failed { error } => Some(error),
            CalculationResult::Priced { .. } => None,
        }
    }
}

impl From<Result<ResolvedPricing, ZoneError>> for CalculationResult {
    fn from(result: Result<ResolvedPricing, ZoneError>) -> Self {
        match result {
            Ok(pricing) => CalculationResult::Priced {
                price: pricing.price,
                period_from: pricing.period.from,
                period_to: pricing.period.to,
            },
            Err(err) => CalculationResult::Failed {
                error: CalculationError::from(&err),
            },
        }
    }
}

/// Zone-based delivery pricing for one configured map
pub struct DeliveryHandler<C> {
    config: HandlerConfig,
    catalog: C,
    cache: Option<ZoneCache>,
}

/// Decoded zone indexes keyed by map id
type ZoneCache = RwLock<HashMap<i64, Arc<ZoneIndex>>>;

impl<C: ZoneCatalog> DeliveryHandler<C> {
    pub fn new(config: HandlerConfig, catalog: C) -> Self {
        Self {
            config,
            catalog,
            cache: None,
        }
    }

    /// Keep each decoded map as an R-tree index for later requests.
    ///
    /// Without a cache every request fetches and decodes the dataset and
    /// scans it linearly. With a cache the dataset is fetched once per map
    /// until [`DeliveryHandler::clear_cache`] is called.
    pub fn with_zone_cache(mut self) -> Self {
        self.cache = Some(RwLock::new(HashMap::new()));
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Whether the order carries a usable coordinate. All failures read as `false`.
    pub fn is_compatible(&self, properties: &OrderProperties) -> bool {
        match extract_coordinate(properties, &self.config) {
            Ok(_) => true,
            Err(err) => {
                debug!("Handler not applicable: {}", err);
                false
            }
        }
    }

    /// Price the order, reporting failures as message plus code
    pub fn calculate(&self, properties: &OrderProperties) -> CalculationResult {
        let result = self.try_calculate(properties);
        if let Err(err) = &result {
            warn!("Delivery calculation failed [{}]: {}", err.code(), err);
        }
        CalculationResult::from(result)
    }

    pub fn try_calculate(&self, properties: &OrderProperties) -> Result<ResolvedPricing, ZoneError> {
        let point = extract_coordinate(properties, &self.config)?;
        self.price_for(&point)
    }

    /// Price for an already extracted coordinate
    pub fn price_for(&self, point: &Coordinate) -> Result<ResolvedPricing, ZoneError> {
        let zone = self.match_zone(point)?;
        resolve_pricing(&zone, &self.config.default_pricing())
    }

    /// Zone of the configured map containing the point
    pub fn match_zone(&self, point: &Coordinate) -> Result<ZoneRecord, ZoneError> {
        let map_id = self.config.map_id()?;

        let zone = match &self.cache {
            Some(cache) => {
                let index = self.cached_index(cache, map_id)?;
                let zone = index.resolve(point)?.clone();
                zone
            }
            None => {
                let zones = self.load_zones(map_id)?;
                let zone = pip::resolve(&zones, point)?.clone();
                zone
            }
        };

        Ok(zone)
    }

    /// Drop all cached maps so the next request reads the catalog again
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            let mut maps = cache.write().unwrap_or_else(PoisonError::into_inner);
            info!("Dropping {} cached zone maps", maps.len());
            maps.clear();
        }
    }

    fn cached_index(&self, cache: &ZoneCache, map_id: i64) -> Result<Arc<ZoneIndex>, ZoneError> {
        if let Some(index) = cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&map_id)
        {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(ZoneIndex::build(self.load_zones(map_id)?));
        info!("Cached map {} with {} zones", map_id, index.len());

        let mut maps = cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(maps.entry(map_id).or_insert(index)))
    }

    fn load_zones(&self, map_id: i64) -> Result<Vec<ZoneRecord>, ZoneError> {
        let raw = self.catalog.fetch(map_id)?;
        let zones = dataset::decode(&raw)?;
        debug!("Map {} has {} usable zones", map_id, zones.len());
        Ok(zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::config::{DEFAULT_PRICE, MAP_ID, PROPERTY_LAT, PROPERTY_LON};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dataset() -> String {
        json!([{
            "delivery_areas": [
                {
                    "area_coordinates": [[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]],
                    "settings": { "title": "Center price: 500 period: 2-4" }
                },
                {
                    "area_coordinates": [[[20.0, 20.0], [20.0, 30.0], [30.0, 30.0], [30.0, 20.0]]],
                    "settings": { "title": "Outskirts" }
                }
            ]
        }])
        .to_string()
    }

    fn handler(config: HandlerConfig) -> DeliveryHandler<InMemoryCatalog> {
        DeliveryHandler::new(config, InMemoryCatalog::new().with_map(1, dataset()))
    }

    fn config() -> HandlerConfig {
        HandlerConfig::new()
            .with(MAP_ID, "1")
            .with(PROPERTY_LAT, "LAT")
            .with(PROPERTY_LON, "LON")
    }

    fn order(lat: &str, lon: &str) -> OrderProperties {
        OrderProperties::new().with("LAT", lat).with("LON", lon)
    }

    #[test]
    fn test_calculate_priced() {
        let result = handler(config()).calculate(&order("5", "5"));
        assert_eq!(
            result,
            CalculationResult::Priced {
                price: 500,
                period_from: Some(2),
                period_to: Some(4),
            }
        );
    }

    #[test]
    fn test_calculate_default_price() {
        let result = handler(config().with(DEFAULT_PRICE, "300")).calculate(&order("25", "25"));
        assert_eq!(
            result,
            CalculationResult::Priced {
                price: 300,
                period_from: None,
                period_to: None,
            }
        );
    }

    #[test]
    fn test_calculate_failures() {
        let h = handler(config());

        let err = h.calculate(&order("25", "25"));
        assert_eq!(err.error().unwrap().code, "UNDETERMINED_PRICE");
        assert_eq!(err.error().unwrap().message, "zone Outskirts price is undefined");

        let err = h.calculate(&order("100", "100"));
        assert_eq!(err.error().unwrap().code, "NO_MATCHING_ZONE");

        let err = handler(config().with(MAP_ID, "2")).calculate(&order("5", "5"));
        assert_eq!(err.error().unwrap().code, "NOT_FOUND");

        let err = handler(config().with(MAP_ID, "")).calculate(&order("5", "5"));
        assert_eq!(err.error().unwrap().code, "CONFIGURATION");
    }

    #[test]
    fn test_is_compatible() {
        let h = handler(config());
        assert!(h.is_compatible(&order("5", "5")));
        // Compatibility does not depend on a zone matching
        assert!(h.is_compatible(&order("100", "100")));
        assert!(!h.is_compatible(&order("", "5")));
        assert!(!h.is_compatible(&OrderProperties::new()));
        assert!(!handler(HandlerConfig::new()).is_compatible(&order("5", "5")));
    }

    #[test]
    fn test_result_serialization() {
        let priced = CalculationResult::Priced {
            price: 500,
            period_from: Some(2),
            period_to: None,
        };
        assert_eq!(
            serde_json::to_value(&priced).unwrap(),
            json!({ "price": 500, "period_from": 2 })
        );

        let failed = CalculationResult::from(Err::<ResolvedPricing, _>(ZoneError::NoMatchingZone));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "error": { "message": "cant find matched zone", "code": "NO_MATCHING_ZONE" } })
        );
    }

    #[test]
    fn test_negative_default_price() {
        let h = handler(config().with(DEFAULT_PRICE, "-300"));
        let result = h.calculate(&order("25", "25"));
        assert_eq!(result.error().unwrap().code, "UNDETERMINED_PRICE");
    }

    /// Catalog that counts how often it is read
    struct CountingCatalog {
        inner: InMemoryCatalog,
        fetches: AtomicUsize,
    }

    impl ZoneCatalog for CountingCatalog {
        fn fetch(&self, map_id: i64) -> Result<String, ZoneError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(map_id)
        }
    }

    fn counting(data: String) -> CountingCatalog {
        CountingCatalog {
            inner: InMemoryCatalog::new().with_map(1, data),
            fetches: AtomicUsize::new(0),
        }
    }

    fn strips() -> String {
        // Overlapping vertical strips, strip i covers x in [i, i + 2]
        let areas: Vec<serde_json::Value> = (0..100)
            .map(|i| {
                let x = i as f64;
                json!({
                    "area_coordinates": [[[x, 0.0], [x, 5.0], [x + 2.0, 5.0], [x + 2.0, 0.0]]],
                    "settings": { "title": format!("Strip {} price: {}", i, i * 10) }
                })
            })
            .collect();
        json!([{ "delivery_areas": areas }]).to_string()
    }

    #[test]
    fn test_zone_cache_reads_catalog_once() {
        let h = DeliveryHandler::new(config(), counting(strips())).with_zone_cache();

        // Strips 49 and 50 both contain the point, the earlier one wins
        let zone = h.match_zone(&Coordinate::new(50.5, 1.0)).unwrap();
        assert_eq!(zone.title, "Strip 49 price: 490");
        assert_eq!(h.price_for(&Coordinate::new(10.5, 1.0)).unwrap().price, 90);
        assert_eq!(
            h.match_zone(&Coordinate::new(500.0, 1.0)).unwrap_err(),
            ZoneError::NoMatchingZone
        );
        assert_eq!(h.catalog.fetches.load(Ordering::SeqCst), 1);

        h.clear_cache();
        h.match_zone(&Coordinate::new(50.5, 1.0)).unwrap();
        assert_eq!(h.catalog.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cached_and_uncached_agree() {
        let cached = DeliveryHandler::new(config(), counting(strips())).with_zone_cache();
        let uncached = DeliveryHandler::new(config(), counting(strips()));

        for step in 0..120 {
            let point = Coordinate::new(step as f64 * 0.85, 2.5);
            assert_eq!(
                cached.match_zone(&point).map(|z| z.title),
                uncached.match_zone(&point).map(|z| z.title)
            );
        }
        assert_eq!(uncached.catalog.fetches.load(Ordering::SeqCst), 120);
    }

    #[test]
    fn test_cache_does_not_keep_failures() {
        let h = DeliveryHandler::new(config().with(MAP_ID, "2"), counting(strips())).with_zone_cache();
        assert!(h.match_zone(&Coordinate::new(1.0, 1.0)).is_err());
        assert!(h.match_zone(&Coordinate::new(1.0, 1.0)).is_err());
        assert_eq!(h.catalog.fetches.load(Ordering::SeqCst), 2);
    }
}
