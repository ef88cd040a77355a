//! Gym REST API Client
//!
//! HTTP client for the occupancy endpoint and the "last route set" widget.
//! Both are a single GET with the location id in the `branch` query
//! parameter. No retries and no caching here; the query layer owns both.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::types::{OccupancyRecord, RouteSetSummary};

/// Data access seam used by the query layer and views
#[async_trait]
pub trait GymApi: Send + Sync {
    /// Current occupancy of one location
    async fn occupancy(&self, location_id: &str) -> ApiResult<OccupancyRecord>;

    /// When each station at one location was last set
    async fn last_route_set(&self, location_id: &str) -> ApiResult<RouteSetSummary>;
}

/// Configuration for the gym API client
#[derive(Debug, Clone)]
pub struct GymApiConfig {
    /// Occupancy endpoint, without query string
    pub occupancy_url: String,
    /// Last-route-set endpoint, without query string
    pub route_set_url: String,
    /// Request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for GymApiConfig {
    fn default() -> Self {
        Self {
            occupancy_url: "https://portal.urbanclimb.com.au/uc-services/ajax/gym/occupancy.ashx"
                .to_string(),
            route_set_url: "https://api-prod.urbanclimb.com.au/widgets/last-set".to_string(),
            request_timeout: None,
            user_agent: format!("gymwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// reqwest-backed [`GymApi`]
pub struct GymApiClient {
    client: Client,
    config: GymApiConfig,
}

impl GymApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: GymApiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// GET `url?branch=<location_id>` and parse the body as `T`
    async fn get_json<T: DeserializeOwned>(&self, url: &str, location_id: &str) -> ApiResult<T> {
        tracing::debug!(url, location_id, "Fetching");

        let response = self
            .client
            .get(url)
            .query(&[("branch", location_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url,
                location_id,
                status = status.as_u16(),
                "Gym API returned an error status"
            );
            return Err(ApiError::Network);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(url, location_id, error = %e, "Gym API returned a malformed body");
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl GymApi for GymApiClient {
    async fn occupancy(&self, location_id: &str) -> ApiResult<OccupancyRecord> {
        self.get_json(&self.config.occupancy_url, location_id).await
    }

    async fn last_route_set(&self, location_id: &str) -> ApiResult<RouteSetSummary> {
        self.get_json(&self.config.route_set_url, location_id).await
    }
}
