use crate::{
    Config, UnitSystem, WeatherError, WeatherSnapshot, model::Coordinates,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One request for current conditions; no retry.
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
        units: UnitSystem,
    ) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}
