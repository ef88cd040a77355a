//! Gym API Data Access
//!
//! Two request/response operations against the remote gym system:
//!
//! - `GET <occupancy_url>?branch=<id>` returns an [`OccupancyRecord`]
//! - `GET <route_set_url>?branch=<id>` returns a [`RouteSetSummary`]
//!
//! A non-success status is a generic [`ApiError::Network`]; a body that is
//! not the expected JSON is [`ApiError::Parse`].

mod client;
mod error;
mod types;

pub use client::{GymApi, GymApiClient, GymApiConfig};
pub use error::{ApiError, ApiResult};
pub use types::{OccupancyRecord, RouteSetSummary, StationSet};

#[cfg(test)]
pub(crate) use client::mock::MockGymApi;
#[cfg(test)]
pub(crate) use types::fixtures;
