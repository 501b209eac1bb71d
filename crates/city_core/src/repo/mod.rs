//! Repository contract for city persistence and its implementations.
//!
//! # Responsibility
//! - Define the persistence contract consumed by `CityService`.
//! - Keep SQL and row mapping out of the service layer.
//!
//! # Invariants
//! - Callers pass already-sanitized, already-wildcarded search patterns.
//! - Window reads never return more than `MAX_STORE_WINDOW` rows.

pub mod city_repo;
pub mod memory_repo;

/// Store-level ceiling on rows fetched by one paginated read.
///
/// Sits above the service page-size limit so that misconfigured callers
/// still cannot pull unbounded windows.
pub const MAX_STORE_WINDOW: u32 = 500;

/// Returns `(offset, limit)` for a 1-based page, with the limit capped.
///
/// Page `0` is read as page `1`. Returns `None` when the offset does not fit
/// in a SQLite integer; such a window lies past every stored row.
pub(crate) fn window_bounds(page: u32, size: u32) -> Option<(i64, i64)> {
    let offset = i64::from(page.saturating_sub(1)).checked_mul(i64::from(size))?;
    let limit = i64::from(size.min(MAX_STORE_WINDOW));
    Some((offset, limit))
}

#[cfg(test)]
mod tests {
    use super::{window_bounds, MAX_STORE_WINDOW};

    #[test]
    fn window_bounds_are_offset_based() {
        assert_eq!(window_bounds(1, 10), Some((0, 10)));
        assert_eq!(window_bounds(3, 10), Some((20, 10)));
    }

    #[test]
    fn window_bounds_treat_page_zero_as_first_page() {
        assert_eq!(window_bounds(0, 25), Some((0, 25)));
    }

    #[test]
    fn window_bounds_cap_limit_but_not_offset() {
        let (offset, limit) = window_bounds(2, 10_000).unwrap();
        assert_eq!(offset, 10_000);
        assert_eq!(limit, i64::from(MAX_STORE_WINDOW));
    }

    #[test]
    fn window_bounds_reject_unaddressable_offsets() {
        assert_eq!(window_bounds(u32::MAX, u32::MAX), None);
        assert!(window_bounds(u32::MAX, 1).is_some());
    }
}
