//! Price and period extraction from free-text zone titles.
//!
//! Zone editors encode pricing rules directly in the zone title, e.g.
//! `"Center price: 1 500 period: 2-4"`. Both tokens are optional and may
//! appear anywhere in the title. The token must not follow an ASCII letter,
//! digit or underscore; any other character, including Cyrillic letters,
//! counts as a separator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Period, ZoneAnnotation};

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)price:\s*([0-9][0-9\s]*)").expect("valid price pattern"));

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)period:\s*([0-9]+)(?:-([0-9]+))?").expect("valid period pattern")
});

/// Parse both annotations from a title
pub fn parse(title: &str) -> ZoneAnnotation {
    ZoneAnnotation {
        price: extract_price(title),
        period: extract_period(title),
    }
}

/// First `price:` token. Whitespace inside the digit run is a thousands separator.
pub fn extract_price(title: &str) -> Option<i64> {
    let caps = PRICE_RE.captures(title)?;
    let digits: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
    digits.parse().ok()
}

/// First `period:` token, either `N` or `N-M`
pub fn extract_period(title: &str) -> Option<Period> {
    let caps = PERIOD_RE.captures(title)?;
    let from = caps[1].parse().ok()?;
    let to = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some(Period { from, to })
}
