use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::Coordinates};

/// Source of a single best-effort location fix.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// Errors with `PermissionDenied` or `LocationUnavailable`.
    async fn current_location(&self) -> Result<Coordinates, WeatherError>;
}

/// A fix supplied up front, from flags or configuration.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    fix: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(fix: Option<Coordinates>) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, WeatherError> {
        let fix = self.fix.ok_or_else(|| {
            WeatherError::LocationUnavailable(
                "location provider is off; pass --lat/--lon or set [location] in the config"
                    .to_string(),
            )
        })?;

        if !fix.is_in_range() {
            return Err(WeatherError::LocationUnavailable(format!(
                "invalid fix: lat {}, lon {}",
                fix.latitude, fix.longitude
            )));
        }

        Ok(fix)
    }
}
