//! # Gymwatch
//!
//! Live climbing-gym occupancy in the terminal.
//!
//! ## Modules
//!
//! - [`catalog`]: the fixed set of gym locations
//! - [`api`]: HTTP client for the occupancy and route-set endpoints
//! - [`query`]: keyed cache with polling, dedup and change notification
//! - [`views`]: selector, single-location and comparison views
//! - [`config`]: TOML config with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gymwatch::{Catalog, Dashboard, DashboardSettings, GymApiClient, GymApiConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::builtin();
//!     let api = Arc::new(GymApiClient::new(GymApiConfig::default())?);
//!     let initial = catalog.default_selection();
//!
//!     let mut dashboard =
//!         Dashboard::new(catalog, api, DashboardSettings::default(), initial).await;
//!     dashboard.changed().await;
//!     println!("{}", dashboard.render(100));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod query;
pub mod time_format;
pub mod views;

pub use api::{ApiError, ApiResult, GymApi, GymApiClient, GymApiConfig, OccupancyRecord, RouteSetSummary};

pub use catalog::{Catalog, CatalogError, Location, Selection, COMPARE};

pub use config::{Config, ConfigError, LoggingConfig};

pub use query::{QueryClient, QueryHandle, QueryKey, QueryState, Ticker};

pub use views::{Comparison, Dashboard, DashboardSettings, InputOutcome, RenderStyle};
