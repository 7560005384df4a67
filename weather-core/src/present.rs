//! Formatting of a snapshot into display strings.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

use crate::{model::WeatherSnapshot, units::UnitSystem};

const CLOCK_FORMAT: &str = "%H:%M";
const LONG_FORMAT: &str = "%b/%d/%Y %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Clear,
    Cloud,
    Rain,
    Storm,
    Snow,
    Mist,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloud => "cloud",
            Self::Rain => "rain",
            Self::Storm => "storm",
            Self::Snow => "snow",
            Self::Mist => "mist",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service icon codes to categories. Night codes keep the app's historic
/// artwork choices (`01n` shows a cloud, `11n` shows rain).
const ICON_TABLE: &[(&str, IconCategory)] = &[
    ("01d", IconCategory::Clear),
    ("02d", IconCategory::Cloud),
    ("03d", IconCategory::Cloud),
    ("04d", IconCategory::Cloud),
    ("09d", IconCategory::Rain),
    ("10d", IconCategory::Rain),
    ("11d", IconCategory::Storm),
    ("13d", IconCategory::Snow),
    ("50d", IconCategory::Mist),
    ("01n", IconCategory::Cloud),
    ("02n", IconCategory::Cloud),
    ("03n", IconCategory::Cloud),
    ("04n", IconCategory::Cloud),
    ("09n", IconCategory::Rain),
    ("10n", IconCategory::Cloud),
    ("11n", IconCategory::Rain),
    ("13n", IconCategory::Snow),
    ("50n", IconCategory::Mist),
];

/// Category for an icon code, or `None` for codes outside the table.
pub fn icon_for(code: &str) -> Option<IconCategory> {
    ICON_TABLE.iter().find(|(c, _)| *c == code).map(|(_, category)| *category)
}

/// Everything the screen shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub main: String,
    pub description: String,
    pub temperature: String,
    pub temp_min: String,
    pub temp_max: String,
    pub humidity: String,
    pub wind_speed: String,
    pub speed_unit: String,
    pub sunrise: String,
    pub sunset: String,
    pub city: String,
    pub country: String,
    pub last_updated: String,
    pub icon: Option<IconCategory>,
}

/// Render in the local timezone.
pub fn render(snapshot: &WeatherSnapshot, units: UnitSystem) -> DisplayModel {
    render_in(snapshot, units, &Local)
}

pub fn render_in<Tz>(snapshot: &WeatherSnapshot, units: UnitSystem, tz: &Tz) -> DisplayModel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let temp_unit = units.temperature_suffix();
    let m = &snapshot.measurements;
    let primary = snapshot.primary_condition();

    DisplayModel {
        main: primary.map(|c| c.main.clone()).unwrap_or_default(),
        description: primary.map(|c| c.description.clone()).unwrap_or_default(),
        temperature: format!("{}{temp_unit}", number(m.temp)),
        temp_min: format!("min {}{temp_unit}", number(m.temp_min)),
        temp_max: format!("max {}{temp_unit}", number(m.temp_max)),
        humidity: format!("{}% humid", m.humidity),
        wind_speed: number(snapshot.wind.speed),
        speed_unit: units.speed_suffix().to_string(),
        sunrise: epoch_in(snapshot.system.sunrise, tz, CLOCK_FORMAT),
        sunset: epoch_in(snapshot.system.sunset, tz, CLOCK_FORMAT),
        city: snapshot.location_name.clone(),
        country: snapshot.system.country.clone(),
        last_updated: format!("Last Updated: {}", epoch_in(snapshot.timestamp, tz, LONG_FORMAT)),
        icon: primary.and_then(|c| icon_for(&c.icon)),
    }
}

/// Whole numbers keep one decimal place (`15.0`); others print in full.
fn number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn epoch_in<Tz>(secs: u64, tz: &Tz, fmt: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|utc| utc.with_timezone(tz).format(fmt).to_string())
        .unwrap_or_default()
}
