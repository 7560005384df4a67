//! Locale-driven choice of measurement units.

use serde::{Deserialize, Serialize};

/// Countries that still report weather in imperial units, in both ISO 3166
/// alpha-2 and alpha-3 form.
const IMPERIAL_COUNTRIES: &[&str] = &["US", "USA", "LR", "LBR", "MM", "MMR"];

/// Environment variables consulted for the process locale, most specific first.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MEASUREMENT", "LANG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a country code to its unit system. Unknown or empty input is metric.
pub fn resolve(country_code: &str) -> UnitSystem {
    let code = country_code.trim();
    if IMPERIAL_COUNTRIES.iter().any(|c| c.eq_ignore_ascii_case(code)) {
        UnitSystem::Imperial
    } else {
        UnitSystem::Metric
    }
}

/// Extract the territory from a POSIX locale string such as `en_US.UTF-8`
/// or `de_DE@euro`.
pub fn country_from_locale(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?;
    let (_, territory) = base.split_once(['_', '-'])?;
    if territory.is_empty() {
        None
    } else {
        Some(territory.to_ascii_uppercase())
    }
}

/// Country of the current process locale, if one is set.
pub fn system_country() -> Option<String> {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| country_from_locale(&value))
}
