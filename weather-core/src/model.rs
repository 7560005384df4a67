use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A geographic position. Also used for a location fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { longitude, latitude }
    }

    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    pub pressure: f64,
    pub humidity: u8,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(rename = "deg")]
    pub direction_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(rename = "all")]
    pub cloudiness_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<f64>,
    pub country: String,
    pub sunrise: u64,
    pub sunset: u64,
}

/// One complete observation, shaped like the OpenWeather "current weather"
/// document so the cached text is the same JSON the service returned.
///
/// Numeric measurements are in whatever unit system was active at fetch time;
/// that tag is not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(rename = "coord")]
    pub coordinates: Coordinates,
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(rename = "main")]
    pub measurements: Measurements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<i64>,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Observation time, epoch seconds.
    #[serde(rename = "dt")]
    pub timestamp: u64,
    #[serde(rename = "sys")]
    pub system: SystemInfo,
    #[serde(rename = "id")]
    pub location_id: i64,
    #[serde(rename = "name")]
    pub location_name: String,
    #[serde(rename = "cod")]
    pub response_code: i64,
}

impl WeatherSnapshot {
    /// Parse and validate a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, WeatherError> {
        let snapshot: Self = serde_json::from_str(text)
            .map_err(|e| WeatherError::Deserialization(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, WeatherError> {
        serde_json::to_string(self).map_err(|e| WeatherError::Storage(std::io::Error::other(e)))
    }

    /// Epoch fields are unsigned, so only the remaining invariants are checked here.
    pub fn validate(&self) -> Result<(), WeatherError> {
        if self.conditions.is_empty() {
            return Err(WeatherError::Deserialization(
                "snapshot contains no weather conditions".to_string(),
            ));
        }
        if !self.coordinates.is_in_range() {
            return Err(WeatherError::Deserialization(format!(
                "coordinates out of range: lat {}, lon {}",
                self.coordinates.latitude, self.coordinates.longitude
            )));
        }
        Ok(())
    }

    /// First condition in the list; the service orders by relevance.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn london() -> WeatherSnapshot {
        WeatherSnapshot {
            coordinates: Coordinates::new(51.5, -0.12),
            conditions: vec![Condition {
                id: 800,
                main: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
            }],
            base: Some("stations".into()),
            measurements: Measurements {
                temp: 15.0,
                feels_like: None,
                pressure: 1012.0,
                humidity: 72,
                temp_min: 13.25,
                temp_max: 16.5,
                sea_level: Some(1012.0),
                grnd_level: None,
            },
            visibility: Some(10000),
            wind: Wind { speed: 4.1, direction_deg: 250.0, gust: None },
            clouds: Clouds { cloudiness_pct: 0 },
            timestamp: 1_700_010_000,
            system: SystemInfo {
                kind: Some(2),
                message: None,
                country: "GB".into(),
                sunrise: 1_700_000_000,
                sunset: 1_700_030_000,
            },
            location_id: 2_643_743,
            location_name: "London".into(),
            response_code: 200,
        }
    }
}
