//! Polling Query Layer
//!
//! Keyed data fetching with polling and change notification:
//!
//! - **QueryClient**: per-key cache of the latest fetch outcome, with
//!   request deduplication (at most one fetch in flight per key)
//! - **QueryHandle**: a mounted query that refetches on an interval and
//!   stops when dropped
//! - **Ticker**: a clock for elapsed-time labels
//!
//! # Example
//!
//! ```rust,ignore
//! use gymwatch::query::{fetcher, QueryClient, QueryKey, QueryOptions};
//! use std::time::Duration;
//!
//! let client = QueryClient::new();
//! let mut handle = client
//!     .watch(
//!         QueryKey::occupancy(id.clone()),
//!         QueryOptions::polling(Duration::from_millis(6000)),
//!         fetcher(move || { let api = api.clone(); let id = id.clone(); async move { api.occupancy(&id).await } }),
//!     )
//!     .await;
//!
//! loop {
//!     handle.changed().await;
//!     println!("{:?}", handle.state());
//! }
//! ```

mod cache;
mod state;
mod ticker;

pub use cache::{fetcher, Fetcher, QueryClient, QueryHandle};
pub use state::{QueryKey, QueryKind, QueryOptions, QueryState};
pub use ticker::Ticker;
