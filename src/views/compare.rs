//! Comparison View
//!
//! Fetches occupancy for every catalog location once and shows them as a
//! bar chart. Data is only shown when every query has succeeded.

use futures_util::future::select_all;
use std::sync::Arc;

use super::render::{alert, bar_chart, spinner, Bar, RenderStyle};
use crate::api::{GymApi, OccupancyRecord};
use crate::catalog::Catalog;
use crate::query::{fetcher, QueryClient, QueryHandle, QueryKey, QueryOptions, QueryState};

/// Series label of the comparison chart
pub const SERIES_LABEL: &str = "Occupancy Capacity";

/// Aggregate outcome of the per-location queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// At least one query failed
    Failed,
    /// No query has completed yet
    Loading,
    /// Every query succeeded
    Ready(Vec<Bar>),
    /// Some succeeded, the rest are still pending; nothing is shown
    Incomplete,
}

/// Combine per-location states.
///
/// Order matters: any error wins, then "all pending", then "all
/// succeeded". A mix of successes and pending queries is `Incomplete`.
pub fn aggregate(states: &[QueryState<OccupancyRecord>]) -> Comparison {
    if states.iter().any(|s| s.is_error()) {
        return Comparison::Failed;
    }
    if states.iter().all(|s| s.is_pending()) {
        return Comparison::Loading;
    }

    let records: Option<Vec<&Arc<OccupancyRecord>>> = states.iter().map(|s| s.data()).collect();
    match records {
        Some(records) => Comparison::Ready(
            records
                .into_iter()
                .map(|r| Bar {
                    label: r.name.clone(),
                    value: r.floored_percentage(),
                    colour: r.colour.clone(),
                })
                .collect(),
        ),
        None => Comparison::Incomplete,
    }
}

pub fn render_comparison(comparison: &Comparison, style: &RenderStyle) -> String {
    match comparison {
        Comparison::Failed => alert("Failed to load occupancy data", style),
        Comparison::Loading => spinner(),
        Comparison::Ready(bars) => bar_chart(SERIES_LABEL, bars, style),
        Comparison::Incomplete => String::new(),
    }
}

pub struct CompareView {
    queries: Vec<QueryHandle<OccupancyRecord>>,
}

impl CompareView {
    /// Mount one single-shot occupancy query per catalog location
    pub async fn mount(
        catalog: &Catalog,
        api: Arc<dyn GymApi>,
        occupancy_client: &QueryClient<OccupancyRecord>,
    ) -> Self {
        tracing::info!(locations = catalog.len(), "Mounting comparison view");

        let mut queries = Vec::with_capacity(catalog.len());
        for location in catalog.locations() {
            let api = Arc::clone(&api);
            let id = location.id.clone();
            let handle = occupancy_client
                .watch(
                    QueryKey::occupancy(location.id.clone()),
                    QueryOptions::once(),
                    fetcher(move || {
                        let api = Arc::clone(&api);
                        let id = id.clone();
                        async move { api.occupancy(&id).await }
                    }),
                )
                .await;
            queries.push(handle);
        }

        Self { queries }
    }

    pub fn states(&self) -> Vec<QueryState<OccupancyRecord>> {
        self.queries.iter().map(|q| q.state()).collect()
    }

    pub fn comparison(&self) -> Comparison {
        aggregate(&self.states())
    }

    pub async fn refresh(&self) {
        futures_util::future::join_all(self.queries.iter().map(|q| q.refetch())).await;
    }

    /// Wait until any location's query changes
    pub async fn changed(&mut self) {
        if self.queries.is_empty() {
            return std::future::pending().await;
        }
        select_all(self.queries.iter_mut().map(|q| Box::pin(q.changed()))).await;
    }

    pub fn render(&self, style: &RenderStyle) -> String {
        render_comparison(&self.comparison(), style)
    }
}
