//! Zonefare - zone-based delivery pricing.
//!
//! Resolves a shipping price and delivery period for an order by locating
//! its coordinate inside one of the priced polygon zones of a map dataset.
//! This library provides the pricing engine shared by the serve and
//! resolve binaries.

pub mod annotation;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handler;
pub mod models;
pub mod order;
pub mod pip;
pub mod pricing;

pub use catalog::{DirectoryCatalog, InMemoryCatalog, ZoneCatalog};
pub use config::HandlerConfig;
pub use error::ZoneError;
pub use handler::{CalculationResult, DeliveryHandler};
pub use models::{Coordinate, DefaultPricing, ResolvedPricing, ZoneRecord};
pub use order::OrderProperties;
