//! Paging envelope for windowed query results.
//!
//! Serialized as `{records, totalCount, currentPage, pageSize, totalPage}`;
//! `totalPage` is derived on output and ignored on input.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

/// One window of query results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Materialized records of the requested window.
    pub records: Vec<T>,
    /// Total rows matching the query across all pages.
    pub total_count: u64,
    /// 1-based page number that was requested.
    pub current_page: u32,
    /// Requested page size.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Builds a page with no records and zero total.
    pub fn empty(current_page: u32, page_size: u32) -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            current_page,
            page_size,
        }
    }

    /// Number of pages needed to cover `total_count`, rounded up.
    ///
    /// Returns `0` when `page_size` is zero.
    pub fn total_page(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    /// Returns whether the window holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts records while keeping paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total_count: self.total_count,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("Page", 5)?;
        page.serialize_field("records", &self.records)?;
        page.serialize_field("totalCount", &self.total_count)?;
        page.serialize_field("currentPage", &self.current_page)?;
        page.serialize_field("pageSize", &self.page_size)?;
        page.serialize_field("totalPage", &self.total_page())?;
        page.end()
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn total_page_rounds_up() {
        let mut page: Page<u8> = Page::empty(1, 10);
        assert!(page.is_empty());
        assert_eq!(page.total_page(), 0);

        page.total_count = 10;
        assert_eq!(page.total_page(), 1);

        page.total_count = 11;
        assert_eq!(page.total_page(), 2);
    }

    #[test]
    fn total_page_is_zero_for_zero_page_size() {
        let mut page: Page<u8> = Page::empty(1, 0);
        page.total_count = 5;
        assert_eq!(page.total_page(), 0);
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Page {
            records: vec![1, 2, 3],
            total_count: 13,
            current_page: 2,
            page_size: 3,
        };

        let mapped = page.map(|value| value * 10);
        assert_eq!(mapped.records, vec![10, 20, 30]);
        assert_eq!(mapped.total_count, 13);
        assert_eq!(mapped.current_page, 2);
        assert_eq!(mapped.page_size, 3);
    }
}
