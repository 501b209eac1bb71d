//! City application service.
//!
//! # Responsibility
//! - Validate city input and pagination parameters before any store access.
//! - Sanitize user search text into a safe `LIKE` pattern.
//! - Translate repository outcomes into use-case errors.
//!
//! # Invariants
//! - Validation fails fast; the first violated rule wins.
//! - Page size never exceeds `MAX_PAGE_SIZE`.
//! - Search patterns never contain wildcards supplied by the caller.
//! - Store failures are propagated untouched as `Repo`.
//! - `update_city`/`delete_city` read before they write; the pair is not
//!   transactional.

use crate::model::city::{City, CityId};
use crate::model::page::Page;
use crate::repo::city_repo::{CityRepository, RepoError};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest page size accepted by `search_by_name`.
pub const MAX_PAGE_SIZE: i64 = 100;

const NAME_MAX_CHARS: usize = 50;
const COUNTRY_CODE_CHARS: usize = 3;
const DISTRICT_MAX_CHARS: usize = 50;

static LIKE_WILDCARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[%_]").expect("valid like wildcard regex"));

pub type ServiceResult<T> = Result<T, CityServiceError>;

/// Service error for city use-cases.
#[derive(Debug)]
pub enum CityServiceError {
    /// A required identifier or field was absent. Carries the field name.
    ParamMissing(&'static str),
    /// A field violated a length/format/range rule.
    ParamInvalid(String),
    /// Pagination parameters outside the allowed bounds.
    ParamOutOfRange(String),
    /// Lookup by id found no row.
    DataNotFound(Option<CityId>),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl CityServiceError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParamMissing(_) => "PARAM_MISSING",
            Self::ParamInvalid(_) => "PARAM_INVALID",
            Self::ParamOutOfRange(_) => "PARAM_OUT_OF_RANGE",
            Self::DataNotFound(_) => "BIZ_DATA_NOT_FOUND",
            Self::Repo(_) => "SYS_INTERNAL_ERROR",
        }
    }
}

impl Display for CityServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParamMissing(field) => write!(f, "required parameter missing: {field}"),
            Self::ParamInvalid(message) => write!(f, "invalid parameter: {message}"),
            Self::ParamOutOfRange(message) => write!(f, "parameter out of range: {message}"),
            Self::DataNotFound(Some(id)) => write!(f, "city not found: {id}"),
            Self::DataNotFound(None) => write!(f, "city not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CityServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CityServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::DataNotFound(Some(id)),
            other => Self::Repo(other),
        }
    }
}

/// Use-case facade over a city repository.
///
/// Holds no mutable state of its own.
pub struct CityService<R: CityRepository> {
    repo: R,
}

impl<R: CityRepository> CityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Gets one city by id.
    ///
    /// # Errors
    /// - `ParamMissing` when `id` is `None`.
    /// - `DataNotFound` when no row matches.
    pub fn get_by_id(&self, id: Option<CityId>) -> ServiceResult<City> {
        let id = id.ok_or(CityServiceError::ParamMissing("city id"))?;
        self.repo
            .find_by_id(id)?
            .ok_or(CityServiceError::DataNotFound(Some(id)))
    }

    /// Lists every city without pagination.
    pub fn get_all(&self) -> ServiceResult<Vec<City>> {
        let cities = self.repo.find_all()?;
        debug!(
            "event=city_list module=service status=ok count={}",
            cities.len()
        );
        Ok(cities)
    }

    /// Searches cities whose name contains `name`, one page at a time.
    ///
    /// # Contract
    /// - `page >= 1` and `1 <= size <= MAX_PAGE_SIZE`, else `ParamOutOfRange`.
    /// - `page` above `u32::MAX` is also `ParamOutOfRange`; smaller pages past
    ///   the last match return an empty page with the full `total_count`.
    /// - Absent or blank `name` yields an empty page without a store call.
    /// - `%` and `_` are stripped from `name` before it is wrapped as
    ///   `%name%`.
    pub fn search_by_name(
        &self,
        name: Option<&str>,
        page: i64,
        size: i64,
    ) -> ServiceResult<Page<City>> {
        let (page, size) = check_page_bounds(page, size)?;

        let Some(name) = name.filter(|value| !is_blank(value)) else {
            debug!("event=city_search module=service status=skipped reason=blank_name page={page} size={size}");
            return Ok(Page::empty(page, size));
        };

        let pattern = build_contains_pattern(name);
        let result = self.repo.find_by_name_like(&pattern, page, size)?;
        debug!(
            "event=city_search module=service status=ok page={page} size={size} total={} returned={}",
            result.total_count,
            result.records.len()
        );
        Ok(result)
    }

    /// Validates and persists a city, returning the stored value.
    pub fn create(&self, city: Option<&City>) -> ServiceResult<City> {
        let city = validate_city(city)?;
        let saved = self.repo.save(city)?;
        info!(
            "event=city_create module=service status=ok city_id={}",
            saved.id.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(saved)
    }

    /// Validates and replaces an existing city.
    ///
    /// # Errors
    /// - Validation errors as for `create`.
    /// - `ParamMissing` when the city carries no id.
    /// - `DataNotFound` when no row has that id, including when the row
    ///   disappears between the existence check and the write.
    pub fn update_city(&self, city: Option<&City>) -> ServiceResult<City> {
        let city = validate_city(city)?;
        let id = city.id.ok_or(CityServiceError::ParamMissing("city id"))?;

        if self.repo.find_by_id(id)?.is_none() {
            warn!("event=city_update module=service status=not_found city_id={id}");
            return Err(CityServiceError::DataNotFound(Some(id)));
        }

        let saved = self.repo.save(city)?;
        info!("event=city_update module=service status=ok city_id={id}");
        Ok(saved)
    }

    /// Deletes a city after confirming it exists.
    pub fn delete_city(&self, id: Option<CityId>) -> ServiceResult<()> {
        let id = id.ok_or(CityServiceError::ParamMissing("city id"))?;

        if self.repo.find_by_id(id)?.is_none() {
            warn!("event=city_delete module=service status=not_found city_id={id}");
            return Err(CityServiceError::DataNotFound(Some(id)));
        }

        self.repo.delete_by_id(id)?;
        info!("event=city_delete module=service status=ok city_id={id}");
        Ok(())
    }
}

/// Checks the shared create/update rules, first failure wins.
pub fn validate_city(city: Option<&City>) -> ServiceResult<&City> {
    let city = city.ok_or(CityServiceError::ParamMissing("city"))?;

    check_text(&city.name, "name", |len| len <= NAME_MAX_CHARS, || {
        format!("name must be at most {NAME_MAX_CHARS} characters")
    })?;
    check_text(
        &city.country_code,
        "country_code",
        |len| len == COUNTRY_CODE_CHARS,
        || format!("country_code must be exactly {COUNTRY_CODE_CHARS} characters"),
    )?;
    check_text(&city.district, "district", |len| len <= DISTRICT_MAX_CHARS, || {
        format!("district must be at most {DISTRICT_MAX_CHARS} characters")
    })?;

    let population = city
        .population
        .ok_or(CityServiceError::ParamMissing("population"))?;
    if population < 0 {
        return Err(CityServiceError::ParamInvalid(
            "population must not be negative".to_string(),
        ));
    }

    Ok(city)
}

/// Removes `LIKE` wildcards from `raw` and wraps it for a contains match.
pub fn build_contains_pattern(raw: &str) -> String {
    let stripped = LIKE_WILDCARD_RE.replace_all(raw, "");
    format!("%{stripped}%")
}

fn check_page_bounds(page: i64, size: i64) -> ServiceResult<(u32, u32)> {
    if page <= 0 {
        return Err(CityServiceError::ParamOutOfRange(format!(
            "page must be greater than 0, got {page}"
        )));
    }
    if size <= 0 {
        return Err(CityServiceError::ParamOutOfRange(format!(
            "size must be greater than 0, got {size}"
        )));
    }
    if size > MAX_PAGE_SIZE {
        return Err(CityServiceError::ParamOutOfRange(format!(
            "size must not exceed {MAX_PAGE_SIZE}, got {size}"
        )));
    }

    let page = u32::try_from(page).map_err(|_| {
        CityServiceError::ParamOutOfRange(format!("page {page} exceeds the supported range"))
    })?;
    let size = u32::try_from(size).map_err(|_| {
        CityServiceError::ParamOutOfRange(format!("size {size} exceeds the supported range"))
    })?;
    Ok((page, size))
}

fn check_text(
    value: &str,
    field: &'static str,
    length_ok: impl Fn(usize) -> bool,
    describe: impl Fn() -> String,
) -> ServiceResult<()> {
    if is_blank(value) {
        return Err(CityServiceError::ParamMissing(field));
    }
    if !length_ok(value.chars().count()) {
        return Err(CityServiceError::ParamInvalid(describe()));
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
