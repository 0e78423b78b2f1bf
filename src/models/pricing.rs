//! Pricing decision types.

use serde::{Deserialize, Serialize};

use super::Period;

/// Delivery period bounds of a resolved price. Either bound may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

impl From<Period> for PricingPeriod {
    fn from(period: Period) -> Self {
        Self {
            from: Some(period.from),
            to: period.to,
        }
    }
}

/// Final price and period handed to the shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPricing {
    pub price: i64,
    pub period: PricingPeriod,
}

/// Operator-configured fallback values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPricing {
    pub price: Option<i64>,
    pub period_from: Option<i64>,
    pub period_to: Option<i64>,
}

impl DefaultPricing {
    pub fn period(&self) -> PricingPeriod {
        PricingPeriod {
            from: self.period_from,
            to: self.period_to,
        }
    }
}
