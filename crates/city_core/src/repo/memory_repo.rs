//! In-memory city repository.
//!
//! # Responsibility
//! - Offer a storage-free `CityRepository` for tests and embedding.
//! - Mirror the SQLite adapter's observable semantics.
//!
//! # Invariants
//! - Ids come from a monotonically increasing counter starting at 1 and are
//!   never reused, even after deletes.
//! - Iteration order is primary-key order.
//! - Name matching follows SQLite `LIKE`: `%`, `_`, ASCII case-insensitive.

use crate::model::city::{City, CityId};
use crate::model::page::Page;
use crate::repo::city_repo::{CityRepository, RepoError, RepoResult};
use crate::repo::window_bounds;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct MemoryState {
    rows: BTreeMap<CityId, City>,
    next_id: CityId,
}

/// `CityRepository` backed by an ordered map.
#[derive(Debug)]
pub struct InMemoryCityRepository {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryCityRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCityRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored cities.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.lock()?.rows.is_empty())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RepoError::InvalidData("in-memory city store lock poisoned".to_string()))
    }
}

impl CityRepository for InMemoryCityRepository {
    fn find_by_id(&self, id: CityId) -> RepoResult<Option<City>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<City>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    fn find_by_name_like(&self, pattern: &str, page: u32, size: u32) -> RepoResult<Page<City>> {
        let state = self.lock()?;
        let matches = state
            .rows
            .values()
            .filter(|city| like_matches(pattern, &city.name))
            .collect::<Vec<_>>();

        let mut result = Page::empty(page, size);
        result.total_count = matches.len() as u64;

        if let Some((offset, limit)) = window_bounds(page, size) {
            let skip = usize::try_from(offset).unwrap_or(usize::MAX);
            let take = usize::try_from(limit).unwrap_or(0);
            result.records = matches.into_iter().skip(skip).take(take).cloned().collect();
        }

        Ok(result)
    }

    fn save(&self, city: &City) -> RepoResult<City> {
        if city.population.is_none() {
            return Err(RepoError::InvalidData(
                "city population is required for persistence".to_string(),
            ));
        }

        let mut state = self.lock()?;
        match city.id {
            None => {
                let id = state.next_id;
                state.next_id += 1;
                let stored = city.clone().with_id(id);
                state.rows.insert(id, stored.clone());
                Ok(stored)
            }
            Some(id) => {
                let Some(slot) = state.rows.get_mut(&id) else {
                    return Err(RepoError::NotFound(id));
                };
                *slot = city.clone();
                Ok(city.clone())
            }
        }
    }

    fn delete_by_id(&self, id: CityId) -> RepoResult<()> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }
}

/// Evaluates a SQL `LIKE` pattern against `value`.
fn like_matches(pattern: &str, value: &str) -> bool {
    let value = value
        .chars()
        .map(|ch| ch.to_ascii_lowercase())
        .collect::<Vec<_>>();

    // reachable[j]: the pattern consumed so far matches value[..j].
    let mut reachable = vec![false; value.len() + 1];
    reachable[0] = true;

    for token in pattern.chars().map(|ch| ch.to_ascii_lowercase()) {
        let mut next = vec![false; value.len() + 1];
        match token {
            '%' => {
                let mut seen = false;
                for (j, slot) in next.iter_mut().enumerate() {
                    seen |= reachable[j];
                    *slot = seen;
                }
            }
            '_' => {
                for j in 1..=value.len() {
                    next[j] = reachable[j - 1];
                }
            }
            literal => {
                for j in 1..=value.len() {
                    next[j] = reachable[j - 1] && value[j - 1] == literal;
                }
            }
        }
        reachable = next;
    }

    reachable[value.len()]
}

#[cfg(test)]
mod tests {
    use super::{like_matches, InMemoryCityRepository};
    use crate::model::city::City;
    use crate::repo::city_repo::{CityRepository, RepoError};

    #[test]
    fn like_matches_contains_pattern_case_insensitively() {
        assert!(like_matches("%spring%", "Springfield"));
        assert!(like_matches("%FIELD", "Springfield"));
        assert!(!like_matches("%shelby%", "Springfield"));
    }

    #[test]
    fn like_matches_single_char_wildcard() {
        assert!(like_matches("R_me", "Rome"));
        assert!(!like_matches("R_me", "Rooome"));
        assert!(like_matches("%", ""));
        assert!(!like_matches("_", ""));
    }

    #[test]
    fn insert_assigns_increasing_ids_that_are_not_reused() {
        let repo = InMemoryCityRepository::new();
        let first = repo.save(&City::new("A", "AAA", "a", 1)).unwrap();
        let second = repo.save(&City::new("B", "BBB", "b", 2)).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        repo.delete_by_id(2).unwrap();
        let third = repo.save(&City::new("C", "CCC", "c", 3)).unwrap();
        assert_eq!(third.id, Some(3));
        assert_eq!(repo.len().unwrap(), 2);
    }

    #[test]
    fn update_of_missing_row_reports_not_found() {
        let repo = InMemoryCityRepository::new();
        let ghost = City::new("Ghost", "GHO", "none", 0).with_id(42);

        let err = repo.save(&ghost).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(42)));
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn name_search_pages_in_id_order() {
        let repo = InMemoryCityRepository::new();
        for name in ["Newark", "Newport", "Boston", "New Haven"] {
            repo.save(&City::new(name, "USA", "d", 10)).unwrap();
        }

        let page = repo.find_by_name_like("%new%", 2, 2).unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].name, "New Haven");
    }

    #[test]
    fn name_search_far_past_the_end_is_empty_but_counted() {
        let repo = InMemoryCityRepository::new();
        repo.save(&City::new("Newark", "USA", "d", 10)).unwrap();

        let page = repo.find_by_name_like("%", u32::MAX, u32::MAX).unwrap();
        assert_eq!(page.total_count, 1);
        assert!(page.is_empty());
        assert_eq!(page.current_page, u32::MAX);
    }
}
