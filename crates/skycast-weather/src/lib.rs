//! Weather lookup for SkyCast
//!
//! Resolves a location through a fallback chain, fetches conditions from the
//! Visual Crossing timeline API and turns them into a display state for a
//! pluggable view.

pub mod app;
pub mod geoip;
pub mod location;
pub mod presenter;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod store;
pub mod timezone;
pub mod types;
pub mod view;

pub use app::WeatherApp;
pub use geoip::{IpLocation, IpLocator};
pub use location::DeviceLocator;
pub use presenter::{PresentOutcome, WeatherPresenter};
pub use provider::WeatherProvider;
pub use resolver::LocationResolver;
pub use store::LastCityStore;
pub use timezone::{city_from_timezone, TimezoneSource};
pub use types::*;
pub use view::WeatherView;
