//! Error kinds for the zone pricing chain.

use thiserror::Error;

/// Failure of a single pricing request. Every variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("{0}")]
    Configuration(String),

    #[error("malformed zone dataset: {0}")]
    MalformedDataset(String),

    #[error("{0}")]
    NotFound(String),

    #[error("cant find matched zone")]
    NoMatchingZone,

    #[error("zone {0} price is undefined")]
    UndeterminedPrice(String),

    #[error("{0}")]
    InvalidCoordinate(String),
}

impl ZoneError {
    /// Stable code reported alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            ZoneError::Configuration(_) => "CONFIGURATION",
            ZoneError::MalformedDataset(_) => "MALFORMED_DATASET",
            ZoneError::NotFound(_) => "NOT_FOUND",
            ZoneError::NoMatchingZone => "NO_MATCHING_ZONE",
            ZoneError::UndeterminedPrice(_) => "UNDETERMINED_PRICE",
            ZoneError::InvalidCoordinate(_) => "INVALID_COORDINATE",
        }
    }
}
