//! Final price and period selection for a matched zone.

use tracing::debug;

use crate::error::ZoneError;
use crate::models::{DefaultPricing, PricingPeriod, ResolvedPricing, ZoneRecord};

/// Combine the zone annotation with configured defaults.
///
/// The price falls back to the default price; a negative default price is
/// treated as unset. The period is taken whole from the zone when the zone
/// declares one, otherwise from the defaults; the two sources are never
/// mixed field by field.
pub fn resolve_pricing(
    matched: &ZoneRecord,
    defaults: &DefaultPricing,
) -> Result<ResolvedPricing, ZoneError> {
    let price = matched
        .price()
        .or(defaults.price.filter(|p| *p >= 0))
        .ok_or_else(|| ZoneError::UndeterminedPrice(matched.title.clone()))?;

    let period = match matched.period() {
        Some(period) => PricingPeriod::from(period),
        None => defaults.period(),
    };

    debug!(
        "Zone '{}' priced at {} (period {:?}-{:?})",
        matched.title, price, period.from, period.to
    );

    Ok(ResolvedPricing { price, period })
}
