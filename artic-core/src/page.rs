use std::sync::Arc;

use serde::Deserialize;

use crate::record::{Record, RecordId};

pub const DEFAULT_ROWS_PER_PAGE: usize = 12;

#[derive(Clone, Debug, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Raw body of a paged listing response.
#[derive(Clone, Debug, Deserialize)]
pub struct PageResponse {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}

/// One fetched batch of records.  Replaced wholesale on navigation, never
/// merged with other pages.
#[derive(Clone, Debug)]
pub struct Page {
    /// 1-based number this page was requested under.
    pub number: usize,
    pub records: Vec<Arc<Record>>,
    pub total_count: usize,
    pub total_pages: usize,
}

impl Page {
    pub fn from_response(number: usize, response: PageResponse) -> Self {
        if response.pagination.current_page != number {
            log::warn!(
                "requested page {} but source answered with page {}",
                number,
                response.pagination.current_page
            );
        }
        Self {
            number,
            records: response.data.into_iter().map(Arc::new).collect(),
            total_count: response.pagination.total,
            total_pages: response.pagination.total_pages,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 0-based offset of the first row of `page_number` in the full listing.
pub fn first_offset(page_number: usize, rows_per_page: usize) -> usize {
    page_number.saturating_sub(1) * rows_per_page
}

/// Table views count pages from zero, the source counts from one.
pub fn page_number_from_index(index: usize) -> usize {
    index + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "pagination": {
            "total": 100,
            "limit": 12,
            "offset": 12,
            "total_pages": 9,
            "current_page": 2
        },
        "data": [
            {"id": 13, "title": "Thirteen", "inscriptions": null},
            {"id": 14, "title": "Fourteen", "inscriptions": "verso"}
        ]
    }"#;

    #[test]
    fn builds_page_from_response() {
        let response: PageResponse = serde_json::from_str(RESPONSE).unwrap();
        let page = Page::from_response(2, response);

        assert_eq!(page.number, 2);
        assert_eq!(page.total_count, 100);
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.len(), 2);
        assert_eq!(page.ids().collect::<Vec<_>>(), [RecordId(13), RecordId(14)]);
        assert!(page.contains(RecordId(14)));
        assert!(!page.contains(RecordId(1)));
    }

    #[test]
    fn requested_number_wins_over_reported_one() {
        let response: PageResponse = serde_json::from_str(RESPONSE).unwrap();
        let page = Page::from_response(5, response);
        assert_eq!(page.number, 5);
    }

    #[test]
    fn offsets() {
        assert_eq!(first_offset(1, DEFAULT_ROWS_PER_PAGE), 0);
        assert_eq!(first_offset(3, DEFAULT_ROWS_PER_PAGE), 24);
        assert_eq!(first_offset(0, DEFAULT_ROWS_PER_PAGE), 0);
        assert_eq!(page_number_from_index(0), 1);
    }
}
