use std::collections::HashMap;
use std::path::Path;

use crate::models::{Airline, Airport};

const EMBEDDED_AIRPORTS: &str = include_str!("../assets/airports.json");
const EMBEDDED_AIRLINES: &str = include_str!("../assets/airlines.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reference data in {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Airport and airline tables keyed by IATA code.
///
/// Loaded once at startup and shared read-only; lookups of unknown codes
/// return `None` rather than failing.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    airports: HashMap<String, Airport>,
    airlines: HashMap<String, Airline>,
}

impl ReferenceCatalog {
    pub fn new(airports: Vec<Airport>, airlines: Vec<Airline>) -> Self {
        Self {
            airports: airports
                .into_iter()
                .map(|a| (a.iata_code.clone(), a))
                .collect(),
            airlines: airlines
                .into_iter()
                .map(|a| (a.iata_code.clone(), a))
                .collect(),
        }
    }

    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_AIRPORTS, EMBEDDED_AIRLINES)
    }

    /// Reads `airports.json` and `airlines.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let airports = read_file(&dir.join("airports.json"))?;
        let airlines = read_file(&dir.join("airlines.json"))?;
        Self::from_json(&airports, &airlines)
    }

    pub fn from_json(airports: &str, airlines: &str) -> Result<Self, CatalogError> {
        let airports: Vec<Airport> = serde_json::from_str(airports).map_err(|source| CatalogError::Parse {
            name: "airports".to_string(),
            source,
        })?;
        let airlines: Vec<Airline> = serde_json::from_str(airlines).map_err(|source| CatalogError::Parse {
            name: "airlines".to_string(),
            source,
        })?;

        let catalog = Self::new(airports, airlines);
        tracing::info!(
            "Reference catalog loaded: {} airports, {} airlines",
            catalog.airports.len(),
            catalog.airlines.len()
        );
        Ok(catalog)
    }

    pub fn airport(&self, iata_code: &str) -> Option<&Airport> {
        self.airports.get(iata_code)
    }

    pub fn airline(&self, iata_code: &str) -> Option<&Airline> {
        self.airlines.get(iata_code)
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn airline_count(&self) -> usize {
        self.airlines.len()
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}
