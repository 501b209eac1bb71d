//! Core domain logic for city management.
//! Owns validation, search sanitization, pagination bounds and persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::city::{City, CityId};
pub use model::dto::{CityDto, CreateCityRequest, SearchCityRequest, UpdateCityRequest};
pub use model::page::Page;
pub use repo::city_repo::{CityRepository, RepoError, RepoResult, SqliteCityRepository};
pub use repo::memory_repo::InMemoryCityRepository;
pub use repo::MAX_STORE_WINDOW;
pub use service::city_service::{CityService, CityServiceError, ServiceResult, MAX_PAGE_SIZE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
