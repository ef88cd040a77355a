//! Root Page
//!
//! Owns the selected location and swaps between the single-location and
//! comparison views. Dropping a view cancels its polling and clock.

use std::sync::Arc;
use std::time::Duration;

use super::compare::CompareView;
use super::occupancy::OccupancyView;
use super::render::RenderStyle;
use super::selector::{LocationSelector, Orientation};
use crate::api::{GymApi, OccupancyRecord, RouteSetSummary};
use crate::catalog::{Catalog, Selection};
use crate::query::QueryClient;

/// Settings for the dashboard and the views it mounts
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Occupancy refetch period of the single-location view
    pub occupancy_refetch: Duration,
    /// Clock period for elapsed-time labels
    pub clock_tick: Duration,
    /// Below this many columns the selector stacks vertically
    pub breakpoint_columns: u16,
    pub style: RenderStyle,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            occupancy_refetch: Duration::from_millis(6000),
            clock_tick: Duration::from_millis(1000),
            breakpoint_columns: 80,
            style: RenderStyle::default(),
        }
    }
}

/// The view currently on screen
pub enum ActiveView {
    Single(OccupancyView),
    Compare(CompareView),
}

/// What a line of user input did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Selected(Selection),
    Unchanged,
    Refreshed,
    Quit,
    Unknown(String),
}

pub struct Dashboard {
    catalog: Catalog,
    api: Arc<dyn GymApi>,
    occupancy: QueryClient<OccupancyRecord>,
    routes: QueryClient<RouteSetSummary>,
    settings: DashboardSettings,
    selector: LocationSelector,
    selection: Selection,
    view: ActiveView,
}

impl Dashboard {
    /// Build the dashboard and mount the view for `initial`
    pub async fn new(
        catalog: Catalog,
        api: Arc<dyn GymApi>,
        settings: DashboardSettings,
        initial: Selection,
    ) -> Self {
        let occupancy = QueryClient::new();
        let routes = QueryClient::new();
        let selector = LocationSelector::new(&catalog, &initial);
        let selection = selector.active().clone();
        let view = mount(&catalog, &api, &occupancy, &routes, &settings, &selection).await;

        Self {
            catalog,
            api,
            occupancy,
            routes,
            settings,
            selector,
            selection,
            view,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Switch to `selection`. Re-selecting the current option is a no-op.
    pub async fn select(&mut self, selection: Selection) -> bool {
        if !self.selector.set_active(&selection) {
            return false;
        }
        self.switch_to(selection).await
    }

    /// Remount for the selector's new active option
    async fn switch_to(&mut self, selection: Selection) -> bool {
        if selection == self.selection {
            return false;
        }

        tracing::info!(from = %self.selection.name(), to = %selection.name(), "Switching view");

        // Mount first so shared keys keep a subscriber across the switch
        let view = mount(
            &self.catalog,
            &self.api,
            &self.occupancy,
            &self.routes,
            &self.settings,
            &selection,
        )
        .await;
        self.view = view;
        self.selection = selection;
        true
    }

    /// Handle one line typed by the user: an option number or name,
    /// `r` to refresh, `q` to quit.
    pub async fn handle_input(&mut self, line: &str) -> InputOutcome {
        let input = line.trim();

        match input.to_ascii_lowercase().as_str() {
            "" => return InputOutcome::Unchanged,
            "q" | "quit" | "exit" => return InputOutcome::Quit,
            "r" | "refresh" => {
                self.refresh().await;
                return InputOutcome::Refreshed;
            }
            _ => {}
        }

        let selected = match input.parse::<usize>() {
            Ok(position) => self.selector.select_index(position),
            Err(_) => self.selector.select_name(input),
        };

        match selected {
            Some(selection) => {
                if self.switch_to(selection.clone()).await {
                    InputOutcome::Selected(selection)
                } else {
                    InputOutcome::Unchanged
                }
            }
            None => InputOutcome::Unknown(input.to_string()),
        }
    }

    /// Refetch everything the current view shows
    pub async fn refresh(&self) {
        match &self.view {
            ActiveView::Single(view) => view.refresh().await,
            ActiveView::Compare(view) => view.refresh().await,
        }
    }

    /// Wait until the current view has something new to show
    pub async fn changed(&mut self) {
        match &mut self.view {
            ActiveView::Single(view) => view.changed().await,
            ActiveView::Compare(view) => view.changed().await,
        }
    }

    /// Full screen: selector, then the active view
    pub fn render(&self, width: u16) -> String {
        let orientation = Orientation::for_width(width, self.settings.breakpoint_columns);
        let body = match &self.view {
            ActiveView::Single(view) => view.render(&self.settings.style),
            ActiveView::Compare(view) => view.render(&self.settings.style),
        };

        format!(
            "{}\n\n{}\n",
            self.selector.render(orientation),
            body
        )
    }
}

async fn mount(
    catalog: &Catalog,
    api: &Arc<dyn GymApi>,
    occupancy: &QueryClient<OccupancyRecord>,
    routes: &QueryClient<RouteSetSummary>,
    settings: &DashboardSettings,
    selection: &Selection,
) -> ActiveView {
    match selection {
        Selection::Location(location) => ActiveView::Single(
            OccupancyView::mount(
                location.clone(),
                Arc::clone(api),
                occupancy,
                routes,
                settings.occupancy_refetch,
                settings.clock_tick,
            )
            .await,
        ),
        Selection::Compare => {
            ActiveView::Compare(CompareView::mount(catalog, Arc::clone(api), occupancy).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::occupancy;
    use crate::api::{MockGymApi, RouteSetSummary};
    use crate::catalog::COMPARE;
    use crate::views::compare::Comparison;

    fn canned_api(catalog: &Catalog) -> MockGymApi {
        catalog.locations().iter().fold(MockGymApi::default(), |api, l| {
            api.with_occupancy(&l.id, occupancy(&l.name, 30.0, "#3498db"))
                .with_route_set(&l.id, RouteSetSummary { stations: vec![] })
        })
    }

    fn mock_api(catalog: &Catalog) -> Arc<MockGymApi> {
        Arc::new(canned_api(catalog))
    }

    fn slow_api(catalog: &Catalog) -> Arc<MockGymApi> {
        Arc::new(canned_api(catalog).with_latency(Duration::from_secs(1)))
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            style: RenderStyle::plain(),
            ..DashboardSettings::default()
        }
    }

    #[tokio::test]
    async fn test_starts_on_default_location() {
        let catalog = Catalog::builtin();
        let api = mock_api(&catalog);
        let initial = catalog.default_selection();

        let dashboard = Dashboard::new(catalog, api, settings(), initial).await;
        assert_eq!(dashboard.selection().name(), "West End");
        assert!(matches!(dashboard.view(), ActiveView::Single(_)));
    }

    #[tokio::test]
    async fn test_compare_never_looks_up_its_own_name() {
        let catalog = Catalog::builtin();
        let api = mock_api(&catalog);
        let ids: Vec<String> = catalog.locations().iter().map(|l| l.id.clone()).collect();

        let mut dashboard =
            Dashboard::new(catalog, api.clone(), settings(), Selection::Compare).await;
        loop {
            if let ActiveView::Compare(view) = dashboard.view() {
                if matches!(view.comparison(), Comparison::Ready(_)) {
                    break;
                }
            }
            dashboard.changed().await;
        }

        let calls = api.calls();
        assert_eq!(calls.len(), ids.len());
        for (endpoint, id) in calls {
            assert_eq!(endpoint, "occupancy");
            assert!(ids.contains(&id), "unexpected id {:?}", id);
            assert_ne!(id, COMPARE);
            assert!(!id.is_empty());
        }
    }

    #[tokio::test]
    async fn test_input_switches_views() {
        let catalog = Catalog::builtin();
        let api = mock_api(&catalog);
        let initial = catalog.default_selection();
        let mut dashboard = Dashboard::new(catalog, api, settings(), initial).await;

        assert_eq!(
            dashboard.handle_input("7").await,
            InputOutcome::Selected(Selection::Compare)
        );
        assert!(matches!(dashboard.view(), ActiveView::Compare(_)));

        let outcome = dashboard.handle_input("milton").await;
        assert!(matches!(outcome, InputOutcome::Selected(ref s) if s.name() == "Milton"));
        assert!(matches!(dashboard.view(), ActiveView::Single(_)));

        assert_eq!(dashboard.handle_input("Milton").await, InputOutcome::Unchanged);
        assert_eq!(dashboard.handle_input("0").await, InputOutcome::Unknown("0".to_string()));
        assert_eq!(
            dashboard.handle_input("Gold Coast").await,
            InputOutcome::Unknown("Gold Coast".to_string())
        );
        assert_eq!(dashboard.handle_input("r").await, InputOutcome::Refreshed);
        assert_eq!(dashboard.handle_input(" q ").await, InputOutcome::Quit);
    }

    #[tokio::test]
    async fn test_render_layout() {
        let catalog = Catalog::builtin();
        let api = mock_api(&catalog);
        let dashboard = Dashboard::new(catalog, api, settings(), Selection::Compare).await;

        let wide = dashboard.render(120);
        assert!(wide.lines().next().unwrap().ends_with("[7 Compare]"));

        let narrow = dashboard.render(40);
        assert_eq!(narrow.lines().nth(6), Some("[7 Compare]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_to_compare_during_in_flight_fetch() {
        let catalog = Catalog::builtin();
        let api = slow_api(&catalog);
        let west_end = catalog.lookup("West End").unwrap().id.clone();
        let initial = catalog.default_selection();
        let mut dashboard = Dashboard::new(catalog, api.clone(), settings(), initial).await;

        // West End occupancy is now in flight
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            dashboard.handle_input("7").await,
            InputOutcome::Selected(Selection::Compare)
        );

        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                if let ActiveView::Compare(view) = dashboard.view() {
                    if matches!(view.comparison(), Comparison::Ready(_)) {
                        break;
                    }
                }
                dashboard.changed().await;
            }
        })
        .await
        .expect("comparison never became ready");

        let west_end_fetches = api
            .calls()
            .into_iter()
            .filter(|(endpoint, id)| endpoint == "occupancy" && *id == west_end)
            .count();
        assert_eq!(west_end_fetches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_from_compare_keeps_in_flight_result() {
        let catalog = Catalog::builtin();
        let api = slow_api(&catalog);
        let mut dashboard = Dashboard::new(catalog, api, settings(), Selection::Compare).await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        let outcome = dashboard.handle_input("2").await;
        assert!(matches!(outcome, InputOutcome::Selected(ref s) if s.name() == "Milton"));

        // Well inside one refetch period
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let ActiveView::Single(view) = dashboard.view() {
                    if view.occupancy_state().is_success() {
                        break;
                    }
                }
                dashboard.changed().await;
            }
        })
        .await
        .expect("occupancy stayed pending after the switch");
    }
}
