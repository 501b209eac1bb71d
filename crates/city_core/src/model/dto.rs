//! Transport-facing shapes and their hand-written mapping to `City`.
//!
//! # Responsibility
//! - Give outer layers (HTTP, FFI) stable serde shapes.
//! - Keep conversions explicit: each mapping builds a new value.
//!
//! # Invariants
//! - Request shapes never carry a caller-chosen id into a create.
//! - Field bounds are not checked here; `CityService` owns validation.

use crate::model::city::{City, CityId};
use crate::service::city_service::CityServiceError;
use serde::{Deserialize, Serialize};

const SEARCH_DEFAULT_PAGE_NO: i64 = 1;
const SEARCH_DEFAULT_PAGE_SIZE: i64 = 10;

/// Outbound city representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: Option<CityId>,
    pub name: String,
    pub country_code: String,
    pub district: String,
    pub population: Option<i32>,
}

impl From<City> for CityDto {
    fn from(value: City) -> Self {
        Self {
            id: value.id,
            name: value.name,
            country_code: value.country_code,
            district: value.district,
            population: value.population,
        }
    }
}

impl From<&City> for CityDto {
    fn from(value: &City) -> Self {
        Self::from(value.clone())
    }
}

/// Inbound payload for city creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub district: String,
    pub population: Option<i32>,
}

impl CreateCityRequest {
    /// Maps the payload to an unsaved city.
    pub fn into_city(self) -> City {
        City {
            id: None,
            name: self.name,
            country_code: self.country_code,
            district: self.district,
            population: self.population,
        }
    }
}

/// Inbound payload for a full city update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityRequest {
    pub id: Option<CityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub district: String,
    pub population: Option<i32>,
}

impl UpdateCityRequest {
    /// Maps the payload to a city addressed by `path_id`.
    ///
    /// # Errors
    /// - `ParamMissing` when the body carries no id.
    /// - `ParamInvalid` when the body id differs from `path_id`.
    pub fn into_city(self, path_id: CityId) -> Result<City, CityServiceError> {
        let body_id = self
            .id
            .ok_or(CityServiceError::ParamMissing("city id"))?;
        if body_id != path_id {
            return Err(CityServiceError::ParamInvalid(format!(
                "path id {path_id} does not match body id {body_id}"
            )));
        }

        Ok(City {
            id: Some(body_id),
            name: self.name,
            country_code: self.country_code,
            district: self.district,
            population: self.population,
        })
    }
}

/// Query parameters for name search.
///
/// Paging values stay signed so out-of-range input reaches the service
/// bound checks instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCityRequest {
    pub name: Option<String>,
    #[serde(default = "default_page_no")]
    pub page_no: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for SearchCityRequest {
    fn default() -> Self {
        Self {
            name: None,
            page_no: SEARCH_DEFAULT_PAGE_NO,
            page_size: SEARCH_DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_no() -> i64 {
    SEARCH_DEFAULT_PAGE_NO
}

fn default_page_size() -> i64 {
    SEARCH_DEFAULT_PAGE_SIZE
}
