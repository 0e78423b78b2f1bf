//! Query coordinate extraction from order properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{parse_numeric, Axis, HandlerConfig};
use crate::error::ZoneError;
use crate::models::Coordinate;

/// A single order property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProperty {
    pub code: String,
    pub value: Value,
}

/// Order properties in their storage order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderProperties(Vec<OrderProperty>);

impl OrderProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: &str, value: impl Into<Value>) -> Self {
        self.push(code, value);
        self
    }

    pub fn push(&mut self, code: &str, value: impl Into<Value>) {
        self.0.push(OrderProperty {
            code: code.to_string(),
            value: value.into(),
        });
    }

    /// First property with exactly this code
    pub fn get(&self, code: &str) -> Option<&OrderProperty> {
        self.0.iter().find(|p| p.code == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for OrderProperties {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(code, value)| OrderProperty { code, value })
                .collect(),
        )
    }
}

/// Read the (latitude, longitude) pair configured for the handler
pub fn extract_coordinate(
    properties: &OrderProperties,
    config: &HandlerConfig,
) -> Result<Coordinate, ZoneError> {
    let lat_code = config.property_code(Axis::Lat)?;
    let lon_code = config.property_code(Axis::Lon)?;

    let lat = find_property(properties, lat_code)?;
    let lon = find_property(properties, lon_code)?;

    Ok(Coordinate::new(numeric_value(lat)?, numeric_value(lon)?))
}

fn find_property<'a>(
    properties: &'a OrderProperties,
    code: &str,
) -> Result<&'a OrderProperty, ZoneError> {
    properties.get(code).ok_or_else(|| {
        ZoneError::InvalidCoordinate(format!("cant find order property with code {}", code))
    })
}

fn numeric_value(property: &OrderProperty) -> Result<f64, ZoneError> {
    let code = &property.code;

    if is_empty_value(&property.value) {
        return Err(ZoneError::InvalidCoordinate(format!(
            "order property {} value is empty",
            code
        )));
    }

    match &property.value {
        Value::Array(_) | Value::Object(_) => Err(ZoneError::InvalidCoordinate(format!(
            "order property {} value must be scalar",
            code
        ))),
        Value::Number(n) => n.as_f64().ok_or_else(|| not_numeric(code)),
        Value::String(s) => parse_numeric(s.trim()).ok_or_else(|| not_numeric(code)),
        _ => Err(not_numeric(code)),
    }
}

fn not_numeric(code: &str) -> ZoneError {
    ZoneError::InvalidCoordinate(format!("order property {} value must be numeric", code))
}

/// Unset values: null, false, zero, `""`, `"0"` and empty collections
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PROPERTY_LAT, PROPERTY_LON};
    use serde_json::json;

    fn config() -> HandlerConfig {
        HandlerConfig::new()
            .with(PROPERTY_LAT, "LAT")
            .with(PROPERTY_LON, "LON")
    }

    fn message(err: ZoneError) -> String {
        assert_eq!(err.code(), "INVALID_COORDINATE");
        err.to_string()
    }

    #[test]
    fn test_extract_numbers_and_strings() {
        let props = OrderProperties::new()
            .with("NAME", "Ivan")
            .with("LAT", "55.75")
            .with("LON", 37.61);

        let coordinate = extract_coordinate(&props, &config()).unwrap();
        assert_eq!(coordinate, Coordinate::new(55.75, 37.61));
    }

    #[test]
    fn test_first_property_with_code_wins() {
        let props = OrderProperties::new()
            .with("LAT", "1")
            .with("LAT", "2")
            .with("LON", "3");

        assert_eq!(
            extract_coordinate(&props, &config()).unwrap(),
            Coordinate::new(1.0, 3.0)
        );
    }

    #[test]
    fn test_missing_property() {
        let props = OrderProperties::new().with("LAT", "1");
        let err = extract_coordinate(&props, &config()).unwrap_err();
        assert_eq!(message(err), "cant find order property with code LON");
    }

    #[test]
    fn test_empty_value() {
        for value in [json!(null), json!(""), json!("0"), json!(0), json!([])] {
            let props = OrderProperties::new().with("LAT", value).with("LON", "1");
            let err = extract_coordinate(&props, &config()).unwrap_err();
            assert_eq!(message(err), "order property LAT value is empty");
        }
    }

    #[test]
    fn test_non_scalar_value() {
        let props = OrderProperties::new()
            .with("LAT", json!([55.7]))
            .with("LON", "1");
        let err = extract_coordinate(&props, &config()).unwrap_err();
        assert_eq!(message(err), "order property LAT value must be scalar");
    }

    #[test]
    fn test_non_numeric_value() {
        let props = OrderProperties::new()
            .with("LAT", "1")
            .with("LON", "north");
        let err = extract_coordinate(&props, &config()).unwrap_err();
        assert_eq!(message(err), "order property LON value must be numeric");
    }

    #[test]
    fn test_missing_property_code_config() {
        let props = OrderProperties::new().with("LAT", "1").with("LON", "1");
        let config = HandlerConfig::new().with(PROPERTY_LAT, "LAT");
        let err = extract_coordinate(&props, &config).unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION");
    }

    #[test]
    fn test_deserialize_from_object() {
        let map = json!({ "LAT": "10", "LON": "20" });
        let props = match map {
            Value::Object(map) => OrderProperties::from(map),
            _ => unreachable!(),
        };
        assert_eq!(props.len(), 2);
        assert_eq!(
            extract_coordinate(&props, &config()).unwrap(),
            Coordinate::new(10.0, 20.0)
        );
    }
}
