//! Location Catalog
//!
//! Static, ordered list of the gyms the dashboard knows about, mapping the
//! human-readable name to the remote system's branch identifier.
//!
//! Iteration order is display order: the selector renders options in the
//! order they appear here, followed by the [`COMPARE`] pseudo-location.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reserved name of the pseudo-location that shows every gym side by side
pub const COMPARE: &str = "Compare";

/// Built-in gyms in display order: (name, branch id)
const BUILTIN_LOCATIONS: [(&str, &str); 6] = [
    ("West End", "D969F1B2-0C9F-49A9-B2AC-D7775642F298"),
    ("Milton", "690326F9-98CE-4249-BD91-53A0676A137B"),
    ("Newstead", "A3010228-DFC6-4317-86C0-3839FFDF3FD0"),
    ("Collingwood", "8674E350-D340-4AB3-A462-5595061A6950"),
    ("Blackburn", "46E5373C-2310-4520-B576-CCB4E4EF548D"),
    ("Townsville", "31D5CE53-0CA1-40A5-AEA6-65A72F786492"),
];

/// A single gym
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Display name, unique within a catalog
    pub name: String,
    /// Opaque branch identifier owned by the remote system
    pub id: String,
}

impl Location {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// What the user currently has selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A real gym
    Location(Location),
    /// The comparison pseudo-location
    Compare,
}

impl Selection {
    /// Display name of the selection
    pub fn name(&self) -> &str {
        match self {
            Selection::Location(location) => &location.name,
            Selection::Compare => COMPARE,
        }
    }
}

/// Ordered, validated collection of locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locations: Vec<Location>,
}

impl Catalog {
    /// Build a catalog, checking that names and ids are unique, ids are
    /// non-empty and nothing collides with [`COMPARE`].
    pub fn new(locations: Vec<Location>) -> Result<Self, CatalogError> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();

        for location in &locations {
            if location.name.eq_ignore_ascii_case(COMPARE) {
                return Err(CatalogError::ReservedName(location.name.clone()));
            }
            if location.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(location.name.clone()));
            }
            if !names.insert(location.name.to_lowercase()) {
                return Err(CatalogError::DuplicateName(location.name.clone()));
            }
            if !ids.insert(location.id.to_lowercase()) {
                return Err(CatalogError::DuplicateId(location.id.clone()));
            }
        }

        Ok(Self { locations })
    }

    /// The built-in gym list
    pub fn builtin() -> Self {
        Self {
            locations: BUILTIN_LOCATIONS
                .iter()
                .map(|(name, id)| Location::new(*name, *id))
                .collect(),
        }
    }

    /// Locations in display order
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Resolve a location by name (case-insensitive)
    pub fn lookup(&self, name: &str) -> Result<&Location, CatalogError> {
        self.locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CatalogError::UnknownLocation(name.to_string()))
    }

    /// Resolve a name into a selection. `Compare` never touches the lookup.
    pub fn selection(&self, name: &str) -> Result<Selection, CatalogError> {
        if name.trim().eq_ignore_ascii_case(COMPARE) {
            return Ok(Selection::Compare);
        }
        self.lookup(name).cloned().map(Selection::Location)
    }

    /// The selection used on startup: the first location, or Compare for an
    /// empty catalog
    pub fn default_selection(&self) -> Selection {
        self.locations
            .first()
            .cloned()
            .map(Selection::Location)
            .unwrap_or(Selection::Compare)
    }

    /// Every selectable option name: locations in order, then Compare
    pub fn option_names(&self) -> Vec<&str> {
        self.locations
            .iter()
            .map(|l| l.name.as_str())
            .chain(std::iter::once(COMPARE))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Catalog construction and lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Duplicate location name: {0}")]
    DuplicateName(String),

    #[error("Duplicate location id: {0}")]
    DuplicateId(String),

    #[error("Location {0} has an empty id")]
    EmptyId(String),

    #[error("Location name {0} is reserved")]
    ReservedName(String),
}
