use crate::error::{Result, SiteScoreError};
use crate::types::site::Coordinates;
use std::collections::BTreeMap;

/// Address resolution. Implementations may fail at any time; callers treat
/// coordinates as optional.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Result<Coordinates>;
}

/// Offline geocoder backed by the `[geocoder.addresses]` config table.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: BTreeMap<String, Coordinates>,
}

impl Gazetteer {
    pub fn from_config(addresses: &BTreeMap<String, [f64; 2]>) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (address, [latitude, longitude]) in addresses {
            entries.insert(normalize(address), Coordinates::new(*latitude, *longitude)?);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn resolve(&self, address: &str) -> Result<Coordinates> {
        let key = normalize(address);
        match self.entries.get(&key) {
            Some(coordinates) => {
                tracing::debug!(address, "gazetteer hit");
                Ok(*coordinates)
            }
            None => {
                tracing::debug!(address, entries = self.entries.len(), "gazetteer miss");
                Err(SiteScoreError::GeocodeUnavailable(address.to_string()))
            }
        }
    }
}

/// Lowercases and collapses whitespace, including around commas.
fn normalize(address: &str) -> String {
    address
        .split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(",")
        .to_lowercase()
}

/// Coordinates for a new site: explicit coordinates win; otherwise the
/// address is geocoded. A failed lookup yields `Ok(None)` plus a warning.
pub fn coordinates_for(
    geocoder: &dyn Geocoder,
    address: Option<&str>,
    manual: Option<Coordinates>,
) -> Option<Coordinates> {
    if manual.is_some() {
        return manual;
    }
    let address = address?.trim();
    if address.is_empty() {
        return None;
    }
    match geocoder.resolve(address) {
        Ok(coordinates) => Some(coordinates),
        Err(err) => {
            tracing::warn!(address, error = %err, "could not resolve address");
            None
        }
    }
}
