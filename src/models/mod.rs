//! Core data models for zone-based delivery pricing.

pub mod pricing;
pub mod zone;

pub use pricing::{DefaultPricing, PricingPeriod, ResolvedPricing};
pub use zone::{Coordinate, Period, ZoneAnnotation, ZoneRecord};
