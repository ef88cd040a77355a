//! Query keys, options and per-key state

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiError;

/// Which endpoint a query hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Occupancy,
    LatestRouteChanges,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Occupancy => "occupancy",
            QueryKind::LatestRouteChanges => "latestRouteChanges",
        }
    }
}

/// Cache key: `(kind, location id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: QueryKind,
    pub location_id: String,
}

impl QueryKey {
    pub fn occupancy(location_id: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::Occupancy,
            location_id: location_id.into(),
        }
    }

    pub fn latest_route_changes(location_id: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::LatestRouteChanges,
            location_id: location_id.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.kind.as_str(), self.location_id)
    }
}

/// How a watched query is refreshed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Refetch on this period after the initial fetch; `None` fetches once
    pub refetch_interval: Option<Duration>,
}

impl QueryOptions {
    pub fn polling(period: Duration) -> Self {
        Self {
            refetch_interval: Some(period),
        }
    }

    pub fn once() -> Self {
        Self::default()
    }
}

/// Outcome of the most recently completed fetch for a key
///
/// `Pending` only until the first fetch completes. After that every
/// completion replaces the state wholesale, so an error after a success
/// hides the old data until the next successful poll.
#[derive(Debug)]
pub enum QueryState<T> {
    Pending,
    Error(Arc<ApiError>),
    Success { data: Arc<T> },
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success { .. })
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            QueryState::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            QueryState::Error(e) => Some(e),
            _ => None,
        }
    }
}

// Manual impl: cloning only bumps the Arcs, T itself need not be Clone.
impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            QueryState::Pending => QueryState::Pending,
            QueryState::Error(e) => QueryState::Error(Arc::clone(e)),
            QueryState::Success { data } => QueryState::Success { data: Arc::clone(data) },
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Pending
    }
}
