use std::collections::HashSet;

use crate::record::RecordId;

/// The canonical set of selected record ids, independent of which page is on
/// screen.  Every operation is total and idempotent.
#[derive(Clone, Debug, Default)]
pub struct SelectionStore {
    ids: HashSet<RecordId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn add(&mut self, id: RecordId) {
        self.ids.insert(id);
    }

    pub fn add_all(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.ids.extend(ids);
    }

    pub fn remove(&mut self, id: RecordId) {
        self.ids.remove(&id);
    }

    pub fn remove_all(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        for id in ids {
            self.ids.remove(&id);
        }
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut store = SelectionStore::new();
        store.add(RecordId(1));
        store.add(RecordId(1));
        store.add_all([RecordId(1), RecordId(2), RecordId(2)]);

        assert_eq!(store.count(), 2);
        assert!(store.is_selected(RecordId(1)));
        assert!(store.is_selected(RecordId(2)));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = SelectionStore::new();
        store.add_all([RecordId(1), RecordId(2)]);
        store.remove(RecordId(1));
        store.remove(RecordId(1));
        store.remove(RecordId(42));

        assert_eq!(store.count(), 1);
        assert!(!store.is_selected(RecordId(1)));
        assert!(store.is_selected(RecordId(2)));
    }

    #[test]
    fn remove_all_touches_only_given_ids() {
        let mut store = SelectionStore::new();
        store.add_all([RecordId(1), RecordId(2), RecordId(13)]);
        store.remove_all([RecordId(1), RecordId(2), RecordId(3)]);

        let mut left: Vec<_> = store.iter().collect();
        left.sort();
        assert_eq!(left, [RecordId(13)]);
    }
}
