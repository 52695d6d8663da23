use crate::error::{Result, SiteScoreError};
use crate::scoring::AnswerSet;
use crate::types::scoring::ScoredResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SiteScoreError::Validation(format!(
                "latitude must be between -90 and 90 (got {latitude})"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SiteScoreError::Validation(format!(
                "longitude must be between -180 and 180 (got {longitude})"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Both halves or neither; a lone latitude or longitude is rejected.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Self>> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Self::new(latitude, longitude).map(Some),
            (None, None) => Ok(None),
            _ => Err(SiteScoreError::Validation(
                "latitude and longitude must be given together".to_string(),
            )),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Environmental zoning class of the site (I least to IV most burdensome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentalClass {
    I,
    II,
    III,
    IV,
}

impl fmt::Display for EnvironmentalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roman = match self {
            EnvironmentalClass::I => "I",
            EnvironmentalClass::II => "II",
            EnvironmentalClass::III => "III",
            EnvironmentalClass::IV => "IV",
        };
        write!(f, "Category {roman}")
    }
}

impl FromStr for EnvironmentalClass {
    type Err = SiteScoreError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        let stripped = normalized
            .strip_prefix("CATEGORY")
            .map(str::trim)
            .unwrap_or(&normalized);
        match stripped {
            "I" | "1" => Ok(Self::I),
            "II" | "2" => Ok(Self::II),
            "III" | "3" => Ok(Self::III),
            "IV" | "4" => Ok(Self::IV),
            _ => Err(SiteScoreError::Validation(format!(
                "unknown environmental class: {value}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub date: NaiveDate,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub area: Option<f64>,
    pub environmental_class: Option<EnvironmentalClass>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub answers: AnswerSet,
    pub scores: ScoredResult,
}

impl Site {
    pub fn disqualified(&self) -> bool {
        self.scores.disqualified
    }
}

/// Input for registering a site.
#[derive(Debug, Clone, Default)]
pub struct NewSite {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<f64>,
    pub environmental_class: Option<EnvironmentalClass>,
    pub notes: String,
}

impl NewSite {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_environmental_class(mut self, class: EnvironmentalClass) -> Self {
        self.environmental_class = Some(class);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_halves() {
        assert!(Coordinates::from_pair(Some(52.1), None).is_err());
        assert!(Coordinates::from_pair(None, Some(5.1)).is_err());
        assert_eq!(Coordinates::from_pair(None, None).ok(), Some(None));
        assert!(Coordinates::from_pair(Some(52.1), Some(5.1))
            .expect("pair is valid")
            .is_some());
    }

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(91.0, 5.0).is_err());
        assert!(Coordinates::new(52.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn environmental_class_parses_common_spellings() {
        assert_eq!("ii".parse::<EnvironmentalClass>().ok(), Some(EnvironmentalClass::II));
        assert_eq!("4".parse::<EnvironmentalClass>().ok(), Some(EnvironmentalClass::IV));
        assert_eq!(
            "Category III".parse::<EnvironmentalClass>().ok(),
            Some(EnvironmentalClass::III)
        );
        assert!("V".parse::<EnvironmentalClass>().is_err());
    }
}
