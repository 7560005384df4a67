//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather snapshot model and its JSON shape
//! - Unit selection, connectivity and location seams
//! - The OpenWeather client, the snapshot cache and the presenter
//! - The fetch-and-cache workflow tying them together
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod location;
pub mod model;
pub mod present;
pub mod provider;
pub mod units;
pub mod workflow;

pub use cache::{FileStore, KeyValueStore, MemoryStore, SnapshotCache};
pub use config::Config;
pub use connectivity::{Connectivity, StaticConnectivity, SystemConnectivity};
pub use error::{HttpErrorKind, WeatherError};
pub use location::{FixedLocation, LocationProvider};
pub use model::{Coordinates, WeatherSnapshot};
pub use present::{DisplayModel, IconCategory};
pub use provider::WeatherProvider;
pub use units::UnitSystem;
pub use workflow::{NoProgress, ProgressIndicator, WaitGuard, WeatherService};
