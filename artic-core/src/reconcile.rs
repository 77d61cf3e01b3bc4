//! Two-way sync between the global [`SelectionStore`] and the page-local
//! selection a table view works with.

use std::{collections::HashSet, sync::Arc};

use crate::{
    page::Page,
    record::{Record, RecordId},
    selection::SelectionStore,
};

/// Rows of `page` whose id is in `store`, in page order.
///
/// Always derived on demand, never stored.
pub fn view_selection(page: &Page, store: &SelectionStore) -> Vec<Arc<Record>> {
    page.records
        .iter()
        .filter(|record| store.is_selected(record.id))
        .cloned()
        .collect()
}

/// Fold a new page-local selection reported by the view back into `store`.
///
/// Ids of the current page are cleared first and the reported rows are
/// added afterwards, so unchecking a row removes exactly that id and ids
/// selected on other pages are never touched.  Rows that are not part of
/// `page` are ignored.
pub fn reconcile_selection(page: &Page, store: &mut SelectionStore, selection: &[Arc<Record>]) {
    let on_page: HashSet<RecordId> = page.ids().collect();

    store.remove_all(on_page.iter().copied());

    for record in selection {
        if on_page.contains(&record.id) {
            store.add(record.id);
        } else {
            log::warn!("ignoring selected row {} not on page {}", record.id, page.number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> Arc<Record> {
        Arc::new(Record {
            id: RecordId(id),
            title: format!("Artwork {id}").into(),
            origin: "".into(),
            artist: "".into(),
            inscriptions: None,
            date_start: None,
            date_end: None,
        })
    }

    fn page(number: usize, ids: impl IntoIterator<Item = u64>) -> Page {
        Page {
            number,
            records: ids.into_iter().map(record).collect(),
            total_count: 100,
            total_pages: 9,
        }
    }

    fn ids(records: &[Arc<Record>]) -> Vec<u64> {
        records.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn view_selection_keeps_page_order() {
        let page = page(1, 1..=12);
        let mut store = SelectionStore::new();
        store.add_all([RecordId(7), RecordId(2), RecordId(20)]);

        assert_eq!(ids(&view_selection(&page, &store)), [2, 7]);
    }

    #[test]
    fn checking_rows_adds_them() {
        let page = page(1, 1..=12);
        let mut store = SelectionStore::new();
        reconcile_selection(&page, &mut store, &[record(1), record(2)]);

        assert_eq!(store.count(), 2);
        assert_eq!(ids(&view_selection(&page, &store)), [1, 2]);
    }

    #[test]
    fn unchecking_removes_exactly_that_id() {
        let page_one = page(1, 1..=12);
        let page_two = page(2, 13..=24);
        let mut store = SelectionStore::new();
        store.add_all([RecordId(1), RecordId(2), RecordId(15)]);

        reconcile_selection(&page_two, &mut store, &[]);
        assert!(!store.is_selected(RecordId(15)));
        assert!(store.is_selected(RecordId(1)));
        assert!(store.is_selected(RecordId(2)));

        let current = view_selection(&page_one, &store);
        let kept: Vec<_> = current.into_iter().filter(|r| r.id != RecordId(2)).collect();
        reconcile_selection(&page_one, &mut store, &kept);
        assert_eq!(store.count(), 1);
        assert!(store.is_selected(RecordId(1)));
    }

    #[test]
    fn foreign_rows_are_not_added() {
        let page = page(1, 1..=12);
        let mut store = SelectionStore::new();
        reconcile_selection(&page, &mut store, &[record(3), record(99)]);

        assert!(store.is_selected(RecordId(3)));
        assert!(!store.is_selected(RecordId(99)));
    }

    #[test]
    fn echoing_current_selection_changes_nothing() {
        let page = page(1, 1..=12);
        let mut store = SelectionStore::new();
        store.add_all([RecordId(4), RecordId(30)]);

        let echoed = view_selection(&page, &store);
        reconcile_selection(&page, &mut store, &echoed);

        assert_eq!(store.count(), 2);
        assert!(store.is_selected(RecordId(4)));
        assert!(store.is_selected(RecordId(30)));
    }
}
