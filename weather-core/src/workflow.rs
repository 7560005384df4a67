//! Location → fetch → cache → render.

use tracing::{info, warn};

use crate::{
    cache::SnapshotCache,
    connectivity::Connectivity,
    error::WeatherError,
    location::LocationProvider,
    model::WeatherSnapshot,
    present::{self, DisplayModel},
    provider::WeatherProvider,
    units::UnitSystem,
};

/// A visible "please wait" state.
pub trait ProgressIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Shows the indicator on creation and hides it on drop, whatever the exit path.
pub struct WaitGuard<'a> {
    indicator: &'a dyn ProgressIndicator,
}

impl<'a> WaitGuard<'a> {
    pub fn show(indicator: &'a dyn ProgressIndicator) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

/// Indicator that displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressIndicator for NoProgress {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Composition root for one run of the app.
///
/// Concurrent `refresh` calls are not coordinated: each races to write the
/// cache and the last one to complete wins.
#[derive(Debug)]
pub struct WeatherService<C, L> {
    connectivity: C,
    location: L,
    provider: Box<dyn WeatherProvider>,
    cache: SnapshotCache,
    units: UnitSystem,
}

impl<C, L> WeatherService<C, L>
where
    C: Connectivity,
    L: LocationProvider,
{
    pub fn new(
        connectivity: C,
        location: L,
        provider: Box<dyn WeatherProvider>,
        cache: SnapshotCache,
        units: UnitSystem,
    ) -> Self {
        Self { connectivity, location, provider, cache, units }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Fetch a fresh snapshot for the current location and cache it.
    ///
    /// On any error the cache is left as it was.
    pub async fn refresh(
        &self,
        progress: &dyn ProgressIndicator,
    ) -> Result<WeatherSnapshot, WeatherError> {
        if !self.connectivity.is_online() {
            warn!("offline; skipping weather fetch");
            return Err(WeatherError::Offline);
        }

        let snapshot = {
            let _wait = WaitGuard::show(progress);
            let fix = self.location.current_location().await?;
            self.provider.fetch_current(fix, self.units).await?
        };

        // A failed write still leaves a good snapshot to show.
        if let Err(e) = self.cache.save(&snapshot) {
            warn!(error = %e, "failed to cache weather snapshot");
        } else {
            info!(location = %snapshot.location_name, "weather refreshed");
        }

        Ok(snapshot)
    }

    /// `refresh`, then render the result.
    pub async fn refresh_display(
        &self,
        progress: &dyn ProgressIndicator,
    ) -> Result<DisplayModel, WeatherError> {
        let snapshot = self.refresh(progress).await?;
        Ok(present::render(&snapshot, self.units))
    }
}
