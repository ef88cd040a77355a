//! Single-Location View
//!
//! Gauge, status and "last updated" label for one gym, plus the list of
//! stations and how long ago each was last set.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use super::render::{alert, gauge, progress_line, RenderStyle};
use crate::api::{GymApi, OccupancyRecord, RouteSetSummary};
use crate::catalog::Location;
use crate::query::{fetcher, QueryClient, QueryHandle, QueryKey, QueryOptions, QueryState, Ticker};
use crate::time_format::{days_ago_label, seconds_ago_label};

pub struct OccupancyView {
    location: Location,
    occupancy: QueryHandle<OccupancyRecord>,
    routes: QueryHandle<RouteSetSummary>,
    clock: Ticker,
}

impl OccupancyView {
    /// Mount the view: poll occupancy every `refetch`, fetch the route set
    /// once, and tick the clock every `tick`.
    pub async fn mount(
        location: Location,
        api: Arc<dyn GymApi>,
        occupancy_client: &QueryClient<OccupancyRecord>,
        routes_client: &QueryClient<RouteSetSummary>,
        refetch: Duration,
        tick: Duration,
    ) -> Self {
        tracing::info!(location = %location.name, "Mounting occupancy view");

        let occupancy = {
            let api = Arc::clone(&api);
            let id = location.id.clone();
            occupancy_client
                .watch(
                    QueryKey::occupancy(location.id.clone()),
                    QueryOptions::polling(refetch),
                    fetcher(move || {
                        let api = Arc::clone(&api);
                        let id = id.clone();
                        async move { api.occupancy(&id).await }
                    }),
                )
                .await
        };

        let routes = {
            let id = location.id.clone();
            routes_client
                .watch(
                    QueryKey::latest_route_changes(location.id.clone()),
                    QueryOptions::once(),
                    fetcher(move || {
                        let api = Arc::clone(&api);
                        let id = id.clone();
                        async move { api.last_route_set(&id).await }
                    }),
                )
                .await
        };

        Self {
            location,
            occupancy,
            routes,
            clock: Ticker::start(tick),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Time as of the last clock tick
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn occupancy_state(&self) -> QueryState<OccupancyRecord> {
        self.occupancy.state()
    }

    pub fn routes_state(&self) -> QueryState<RouteSetSummary> {
        self.routes.state()
    }

    /// Refetch both queries immediately
    pub async fn refresh(&self) {
        tokio::join!(self.occupancy.refetch(), self.routes.refetch());
    }

    /// Wait until a query settles or the clock ticks
    pub async fn changed(&mut self) {
        tokio::select! {
            _ = self.occupancy.changed() => {}
            _ = self.routes.changed() => {}
            _ = self.clock.changed() => {}
        }
    }

    pub fn render(&self, style: &RenderStyle) -> String {
        render_occupancy(
            &self.location.name,
            &self.occupancy.state(),
            &self.routes.state(),
            self.now(),
            style,
        )
    }
}

/// Render the view for the given query states
pub fn render_occupancy(
    location_name: &str,
    occupancy: &QueryState<OccupancyRecord>,
    routes: &QueryState<RouteSetSummary>,
    now: DateTime<Utc>,
    style: &RenderStyle,
) -> String {
    let record = match occupancy {
        QueryState::Error(_) => {
            return alert(
                &format!("Failed to load occupancy data for: {}", location_name),
                style,
            )
        }
        QueryState::Pending => return progress_line(style),
        QueryState::Success { data, .. } => data,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Status: {}", record.status);
    let _ = writeln!(out, "Last Updated: {}", last_updated_label(record, now));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        gauge(record.gauge_percentage(), &record.colour, style)
    );

    match routes {
        QueryState::Success { data, .. } => {
            let _ = writeln!(out);
            out.push_str(&render_route_changes(data, now));
        }
        QueryState::Error(_) => {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}",
                alert(
                    &format!("Failed to load route set data for: {}", location_name),
                    style
                )
            );
        }
        QueryState::Pending => {}
    }

    out.trim_end().to_string()
}

fn last_updated_label(record: &OccupancyRecord, now: DateTime<Utc>) -> String {
    match record.last_updated_at() {
        Some(at) => seconds_ago_label(now, at),
        None => "unknown".to_string(),
    }
}

/// Two-column grid of station name and days since it was last set
pub fn render_route_changes(summary: &RouteSetSummary, now: DateTime<Utc>) -> String {
    let name_width = summary
        .stations
        .iter()
        .map(|s| s.station_name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Latest Route Changes\n");
    for station in &summary.stations {
        let ago = station
            .last_set_at()
            .map(|at| days_ago_label(now, at))
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(
            out,
            "{:<width$}  {}",
            station.station_name,
            ago,
            width = name_width
        );
    }
    out
}
