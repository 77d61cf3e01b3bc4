//! "Select first N rows" of the loaded page, and the dialog that asks for N.

use std::{num::IntErrorKind, sync::Arc};

use crate::{error::Error, record::Record, selection::SelectionStore};

/// Parse the count typed into the bulk-select dialog.  Only positive
/// integers are accepted; anything too large to represent covers the whole
/// page anyway.
pub fn parse_count(input: &str) -> Result<usize, Error> {
    let invalid = || Error::InvalidBulkCount(input.to_string());
    match input.trim().parse::<i64>() {
        Ok(count) if count > 0 => Ok(usize::try_from(count).unwrap_or(usize::MAX)),
        Ok(_) => Err(invalid()),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
        Err(_) => Err(invalid()),
    }
}

/// Add the first `count` records of `records`, in page order, to `store`.
/// Never reaches past the loaded page.  Returns how many rows were taken.
pub fn select_first_n(count: usize, records: &[Arc<Record>], store: &mut SelectionStore) -> usize {
    let take = count.min(records.len());
    store.add_all(records[..take].iter().map(|record| record.id));
    take
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkSelectDialog {
    visible: bool,
    input: String,
}

impl BulkSelectDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn cancel(&mut self) {
        self.visible = false;
    }

    /// Whether the confirm action is enabled.
    pub fn can_confirm(&self) -> bool {
        parse_count(&self.input).is_ok()
    }

    /// On a valid count, select the rows, clear the input and close.  On an
    /// invalid one nothing changes and the dialog stays open.
    pub fn confirm(
        &mut self,
        records: &[Arc<Record>],
        store: &mut SelectionStore,
    ) -> Result<usize, Error> {
        let count = parse_count(&self.input)?;
        let taken = select_first_n(count, records, store);
        self.input.clear();
        self.visible = false;
        Ok(taken)
    }
}
