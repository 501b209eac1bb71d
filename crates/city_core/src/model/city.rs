//! City domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the `city` table.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on insert.
//! - Field bounds are enforced by the service layer before persistence,
//!   not by this type.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a city row.
pub type CityId = i64;

/// Canonical domain record for a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Primary key. Absent before first persistence.
    pub id: Option<CityId>,
    pub name: String,
    /// Three-character country code, e.g. `USA`.
    pub country_code: String,
    pub district: String,
    /// Optional at input boundaries, required before persistence.
    pub population: Option<i32>,
}

impl City {
    /// Creates a not-yet-persisted city.
    pub fn new(
        name: impl Into<String>,
        country_code: impl Into<String>,
        district: impl Into<String>,
        population: i32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            country_code: country_code.into(),
            district: district.into(),
            population: Some(population),
        }
    }

    /// Returns a copy carrying the given store identity.
    pub fn with_id(mut self, id: CityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns whether this city has been persisted at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
