//! City repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/save/delete/search APIs over the `city` table.
//! - Translate between `City` and its row shape in one place.
//!
//! # Invariants
//! - `save` inserts when `id` is absent and updates by id otherwise.
//! - An update that touches no row is reported as `NotFound`.
//! - `delete_by_id` is idempotent.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::city::{City, CityId};
use crate::model::page::Page;
use crate::repo::window_bounds;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CITY_SELECT_SQL: &str = "SELECT
    id,
    name,
    country_code,
    district,
    population
FROM city";

const CITY_REQUIRED_COLUMNS: [&str; 5] = ["id", "name", "country_code", "district", "population"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for city persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(CityId),
    InvalidData(String),
    /// Connection schema is behind what this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "city not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid city data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required version {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the city aggregate.
pub trait CityRepository {
    /// Point lookup by primary key.
    fn find_by_id(&self, id: CityId) -> RepoResult<Option<City>>;
    /// Every city, fully materialized, in store order.
    fn find_all(&self) -> RepoResult<Vec<City>>;
    /// Offset-paginated LIKE search over `name`.
    ///
    /// `pattern` is used verbatim; `page` is 1-based.
    fn find_by_name_like(&self, pattern: &str, page: u32, size: u32) -> RepoResult<Page<City>>;
    /// Inserts when `city.id` is `None`, updates by id otherwise.
    fn save(&self, city: &City) -> RepoResult<City>;
    /// Removes the row if present; missing ids are a no-op.
    fn delete_by_id(&self, id: CityId) -> RepoResult<()>;
}

impl<T: CityRepository + ?Sized> CityRepository for &T {
    fn find_by_id(&self, id: CityId) -> RepoResult<Option<City>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<City>> {
        (**self).find_all()
    }

    fn find_by_name_like(&self, pattern: &str, page: u32, size: u32) -> RepoResult<Page<City>> {
        (**self).find_by_name_like(pattern, page, size)
    }

    fn save(&self, city: &City) -> RepoResult<City> {
        (**self).save(city)
    }

    fn delete_by_id(&self, id: CityId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed city repository.
pub struct SqliteCityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCityRepository<'conn> {
    /// Wraps a migrated connection after checking its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_city_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CityRepository for SqliteCityRepository<'_> {
    fn find_by_id(&self, id: CityId) -> RepoResult<Option<City>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CITY_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row([id], CityRow::read).optional()?;
        row.map(CityRow::into_city).transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<City>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CITY_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], CityRow::read)?;

        let mut cities = Vec::new();
        for row in rows {
            cities.push(row?.into_city()?);
        }
        Ok(cities)
    }

    fn find_by_name_like(&self, pattern: &str, page: u32, size: u32) -> RepoResult<Page<City>> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM city WHERE name LIKE ?1;",
            [pattern],
            |row| row.get(0),
        )?;
        let total_count = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative match count `{total}`")))?;

        let mut result = Page::empty(page, size);
        result.total_count = total_count;
        if total_count == 0 || size == 0 {
            return Ok(result);
        }

        let Some((offset, limit)) = window_bounds(page, size) else {
            return Ok(result);
        };
        let mut stmt = self.conn.prepare(&format!(
            "{CITY_SELECT_SQL}
             WHERE name LIKE ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let rows = stmt.query_map(params![pattern, limit, offset], CityRow::read)?;
        for row in rows {
            result.records.push(row?.into_city()?);
        }

        Ok(result)
    }

    fn save(&self, city: &City) -> RepoResult<City> {
        let row = CityRow::from_city(city)?;

        match row.id {
            None => {
                self.conn.execute(
                    "INSERT INTO city (name, country_code, district, population)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![row.name, row.country_code, row.district, row.population],
                )?;
                let id = self.conn.last_insert_rowid();
                Ok(city.clone().with_id(id))
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE city
                     SET
                        name = ?1,
                        country_code = ?2,
                        district = ?3,
                        population = ?4
                     WHERE id = ?5;",
                    params![row.name, row.country_code, row.district, row.population, id],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(id));
                }
                Ok(city.clone())
            }
        }
    }

    fn delete_by_id(&self, id: CityId) -> RepoResult<()> {
        self.conn.execute("DELETE FROM city WHERE id = ?1;", [id])?;
        Ok(())
    }
}

/// Row shape of the `city` table.
struct CityRow {
    id: Option<CityId>,
    name: String,
    country_code: String,
    district: String,
    population: Option<i64>,
}

impl CityRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            country_code: row.get("country_code")?,
            district: row.get("district")?,
            population: row.get("population")?,
        })
    }

    fn from_city(city: &City) -> RepoResult<Self> {
        let population = city.population.ok_or_else(|| {
            RepoError::InvalidData("city population is required for persistence".to_string())
        })?;

        Ok(Self {
            id: city.id,
            name: city.name.clone(),
            country_code: city.country_code.clone(),
            district: city.district.clone(),
            population: Some(i64::from(population)),
        })
    }

    fn into_city(self) -> RepoResult<City> {
        let id = self
            .id
            .ok_or_else(|| RepoError::InvalidData("missing value in city.id".to_string()))?;
        let population = match self.population {
            Some(value) => i32::try_from(value).map_err(|_| {
                RepoError::InvalidData(format!(
                    "population `{value}` out of range in city.population (id {id})"
                ))
            })?,
            None => {
                return Err(RepoError::InvalidData(format!(
                    "missing value in city.population (id {id})"
                )));
            }
        };

        Ok(City {
            id: Some(id),
            name: self.name,
            country_code: self.country_code,
            district: self.district,
            population: Some(population),
        })
    }
}

fn ensure_city_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "city")? {
        return Err(RepoError::MissingRequiredTable("city"));
    }

    for column in CITY_REQUIRED_COLUMNS {
        if !table_has_column(conn, "city", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "city",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
