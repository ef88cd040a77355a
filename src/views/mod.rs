//! Presentation
//!
//! Text views over the query layer:
//!
//! - [`selector`]: location toggle set
//! - [`occupancy`]: gauge, status and route changes for one gym
//! - [`compare`]: bar chart across every gym
//! - [`dashboard`]: root page wiring the selection to the views

pub mod compare;
pub mod dashboard;
pub mod occupancy;
pub mod render;
pub mod selector;

pub use compare::{aggregate, CompareView, Comparison};
pub use dashboard::{ActiveView, Dashboard, DashboardSettings, InputOutcome};
pub use occupancy::OccupancyView;
pub use render::RenderStyle;
pub use selector::{LocationSelector, Orientation};
