//! Core library for the single-screen weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather fetcher and device geolocation seams
//! - Session state as a pure reducer, and the two screens rendered from it
//!
//! It is used by `weather-cli`, but the reducer and renderer have no I/O and
//! can back any other front-end.

pub mod app;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use app::App;
pub use config::{Config, GeolocationConfig, GeolocationMode};
pub use error::{FetchError, LocationError};
pub use geolocation::Geolocator;
pub use model::{Coordinates, Endpoint, WeatherQuery, WeatherResult};
pub use provider::WeatherSource;
pub use session::{Effect, Event, Session, SessionState};
pub use view::{Screen, render};
