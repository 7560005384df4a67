use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, Connectivity, Coordinates, DisplayModel, FileStore, FixedLocation, SnapshotCache,
    SystemConnectivity, UnitSystem, WeatherService, present, provider::provider_from_config,
};

use crate::output::{self, StderrProgress};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key, default location and country.
    Configure,

    /// Show the last cached weather without touching the network.
    Show {
        /// Country code used to pick units, e.g. "US" or "GBR".
        #[arg(long)]
        country: Option<String>,
    },

    /// Fetch current weather for the location and cache it.
    Refresh {
        /// Latitude of the location fix.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the location fix.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Country code used to pick units, e.g. "US" or "GBR".
        #[arg(long)]
        country: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { country } => show(country.as_deref()),
            Command::Refresh { lat, lon, country } => {
                let fix = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                refresh(fix, country.as_deref()).await
            }
        }
    }
}

fn open_cache() -> anyhow::Result<SnapshotCache> {
    let store = FileStore::new(Config::store_file_path()?);
    tracing::debug!(path = %store.path().display(), "opening snapshot store");
    Ok(SnapshotCache::new(Box::new(store)))
}

fn cached_display(cache: &SnapshotCache, units: UnitSystem) -> Option<DisplayModel> {
    cache.load().map(|snapshot| present::render(&snapshot, units))
}

/// Run the fetch workflow. Any failure, including missing configuration,
/// comes back as the notice to show instead of fresh data.
async fn fetch_fresh<C: Connectivity>(
    cfg: &Config,
    cache: SnapshotCache,
    connectivity: C,
    fix: Option<Coordinates>,
    units: UnitSystem,
) -> Result<DisplayModel, String> {
    let provider = provider_from_config(cfg).map_err(|e| {
        tracing::warn!(error = %e, "weather provider not configured");
        e.to_string()
    })?;
    let location = FixedLocation::new(fix.or_else(|| cfg.saved_location()));
    let service = WeatherService::new(connectivity, location, provider, cache, units);

    service.refresh_display(&StderrProgress).await.map_err(|e| {
        if e.is_fetch_failure() {
            tracing::error!(error = %e, "weather fetch failed");
        } else {
            tracing::warn!(error = %e, "weather fetch skipped");
        }
        e.user_message()
    })
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key.trim().to_string());
    }

    let country = Text::new("Country code for units (blank = use locale):")
        .with_default(cfg.country.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read country")?;
    cfg.country = Some(country.trim().to_string()).filter(|c| !c.is_empty());

    let latitude = CustomType::<f64>::new("Default latitude (Esc to skip):")
        .with_error_message("Please enter a number")
        .prompt_skippable()
        .context("Failed to read latitude")?;
    if let Some(latitude) = latitude {
        let longitude = CustomType::<f64>::new("Default longitude:")
            .with_error_message("Please enter a number")
            .prompt()
            .context("Failed to read longitude")?;
        cfg.set_location(latitude, longitude);
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn show(country: Option<&str>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let units = cfg.unit_system(country);

    match cached_display(&open_cache()?, units) {
        Some(display) => output::print_display(&display),
        None => output::print_empty(),
    }
    Ok(())
}

async fn refresh(fix: Option<Coordinates>, country: Option<&str>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let units = cfg.unit_system(country);
    let cache = open_cache()?;

    let cached = cached_display(&cache, units);
    if let Some(display) = &cached {
        output::print_display(display);
        println!();
    }

    match fetch_fresh(&cfg, cache, SystemConnectivity::new(), fix, units).await {
        Ok(display) => output::print_display(&display),
        Err(notice) => {
            eprintln!("{notice}");
            if cached.is_none() {
                output::print_empty();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{StaticConnectivity, WeatherSnapshot};

    fn primed_cache() -> SnapshotCache {
        let snapshot = WeatherSnapshot::from_json(
            r#"{
                "coord": {"lon": -0.12, "lat": 51.5},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "main": {"temp": 15.0, "pressure": 1012, "humidity": 72, "temp_min": 13.0, "temp_max": 16.0},
                "wind": {"speed": 4.1, "deg": 250},
                "clouds": {"all": 0},
                "dt": 1700010000,
                "sys": {"country": "GB", "sunrise": 1700000000, "sunset": 1700030000},
                "id": 2643743,
                "name": "London",
                "cod": 200
            }"#,
        )
        .expect("valid snapshot");

        let cache = SnapshotCache::in_memory();
        cache.save(&snapshot).expect("save");
        cache
    }

    #[tokio::test]
    async fn cached_weather_renders_even_when_fetch_cannot_start() {
        let cfg = Config::default();
        let cache = primed_cache();

        let cached = cached_display(&cache, UnitSystem::Metric).expect("cached display");
        assert_eq!(cached.city, "London");
        assert_eq!(cached.temperature, "15.0°C");

        let notice = fetch_fresh(
            &cfg,
            cache,
            StaticConnectivity(false),
            Some(Coordinates::new(51.5, -0.12)),
            UnitSystem::Metric,
        )
        .await
        .unwrap_err();

        if cfg.resolve_api_key().is_none() {
            assert!(notice.contains("No OpenWeather API key configured"), "{notice}");
        } else {
            assert!(notice.contains("offline"), "{notice}");
        }
    }

    #[tokio::test]
    async fn offline_with_key_reports_offline_notice() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let notice = fetch_fresh(
            &cfg,
            primed_cache(),
            StaticConnectivity(false),
            Some(Coordinates::new(51.5, -0.12)),
            UnitSystem::Metric,
        )
        .await
        .unwrap_err();

        assert!(notice.contains("offline"), "{notice}");
    }

    #[test]
    fn empty_cache_has_no_display() {
        assert!(cached_display(&SnapshotCache::in_memory(), UnitSystem::Metric).is_none());
    }
}
