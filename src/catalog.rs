//! Zone catalog lookup by map id.

use hashbrown::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ZoneError;

/// Source of raw zone datasets
pub trait ZoneCatalog: Send + Sync {
    /// Raw dataset stored under the map id
    fn fetch(&self, map_id: i64) -> Result<String, ZoneError>;
}

fn not_found(map_id: i64) -> ZoneError {
    ZoneError::NotFound(format!("cant find zone with id equals {}", map_id))
}

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    maps: HashMap<i64, String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, map_id: i64, data: impl Into<String>) -> Self {
        self.insert(map_id, data);
        self
    }

    pub fn insert(&mut self, map_id: i64, data: impl Into<String>) {
        self.maps.insert(map_id, data.into());
    }
}

impl ZoneCatalog for InMemoryCatalog {
    fn fetch(&self, map_id: i64) -> Result<String, ZoneError> {
        self.maps.get(&map_id).cloned().ok_or_else(|| not_found(map_id))
    }
}

/// Catalog of `<map_id>.json` files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, map_id: i64) -> PathBuf {
        self.root.join(format!("{}.json", map_id))
    }
}

impl ZoneCatalog for DirectoryCatalog {
    fn fetch(&self, map_id: i64) -> Result<String, ZoneError> {
        let path = self.path_for(map_id);
        debug!("Reading zone dataset {}", path.display());

        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(map_id),
            _ => ZoneError::NotFound(format!(
                "cant read zone with id equals {}: {}",
                map_id, e
            )),
        })
    }
}
