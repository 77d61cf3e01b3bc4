use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    bulk::BulkSelectDialog,
    controller::{LoadState, PageController, PageLoaded},
    page::{page_number_from_index, DEFAULT_ROWS_PER_PAGE},
    reconcile::{reconcile_selection, view_selection},
    record::Record,
    selection::SelectionStore,
    webapi::PageFetcher,
};

pub enum TableEvent {
    /// The view's paginator moved to the 0-based page `index`.
    PageChange { index: usize },
    /// The view reports the full list of checked rows of page `page`.
    SelectionChange {
        page: usize,
        selection: Vec<Arc<Record>>,
    },
    OpenBulkSelect,
    BulkSelectInput(String),
    ConfirmBulkSelect,
    CancelBulkSelect,
    Retry,
    PageLoaded(PageLoaded),
    Shutdown,
}

impl From<PageLoaded> for TableEvent {
    fn from(loaded: PageLoaded) -> Self {
        Self::PageLoaded(loaded)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogProps {
    pub input: String,
    pub can_confirm: bool,
}

/// Everything a table view needs to draw one frame.
#[derive(Clone, Debug)]
pub struct TableProps {
    pub rows: Vec<Arc<Record>>,
    pub total_records: usize,
    pub loading: bool,
    /// 0-based offset of the first row of the current page.
    pub first: usize,
    /// Number of the page `rows` belong to.
    pub rows_page: Option<usize>,
    pub selection: Vec<Arc<Record>>,
    pub selected_count: usize,
    pub page_number: usize,
    pub total_pages: Option<usize>,
    pub rows_per_page: usize,
    pub dialog: Option<DialogProps>,
    pub error: Option<String>,
}

pub trait TableView {
    fn render(&mut self, props: &TableProps);
}

/// One table session: owns the selection and the page on display, applies
/// events one at a time and re-renders its view after each.
pub struct Table<V: TableView> {
    controller: PageController,
    selection: SelectionStore,
    dialog: BulkSelectDialog,
    view: V,
    sender: Sender<TableEvent>,
    receiver: Receiver<TableEvent>,
}

impl<V: TableView> Table<V> {
    pub fn new(fetcher: Arc<dyn PageFetcher>, view: V) -> Self {
        Self::with_rows_per_page(fetcher, DEFAULT_ROWS_PER_PAGE, view)
    }

    pub fn with_rows_per_page(
        fetcher: Arc<dyn PageFetcher>,
        rows_per_page: usize,
        view: V,
    ) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            controller: PageController::new(fetcher, rows_per_page),
            selection: SelectionStore::new(),
            dialog: BulkSelectDialog::new(),
            view,
            sender,
            receiver,
        }
    }

    pub fn sender(&self) -> Sender<TableEvent> {
        self.sender.clone()
    }

    pub fn receiver(&self) -> Receiver<TableEvent> {
        self.receiver.clone()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    pub fn dialog(&self) -> &BulkSelectDialog {
        &self.dialog
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Start loading the first page.
    pub fn mount(&mut self) {
        if self.controller.state() == LoadState::Idle {
            self.controller.request_page(1, &self.sender);
        }
        self.refresh();
    }

    /// Handle events until `Shutdown` arrives.
    pub fn run(&mut self) {
        let receiver = self.receiver();
        for event in receiver {
            if let TableEvent::Shutdown = event {
                break;
            }
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: TableEvent) {
        match event {
            TableEvent::PageChange { index } => {
                let number = page_number_from_index(index);
                self.controller.request_page(number, &self.sender);
            }
            TableEvent::SelectionChange { page, selection } => {
                self.handle_selection_change(page, &selection);
            }
            TableEvent::OpenBulkSelect => {
                self.dialog.open();
            }
            TableEvent::BulkSelectInput(input) => {
                self.dialog.set_input(input);
            }
            TableEvent::ConfirmBulkSelect => {
                self.handle_bulk_select();
            }
            TableEvent::CancelBulkSelect => {
                self.dialog.cancel();
            }
            TableEvent::Retry => {
                self.controller.retry(&self.sender);
            }
            TableEvent::PageLoaded(loaded) => {
                if !self.controller.handle_loaded(loaded) {
                    return;
                }
            }
            TableEvent::Shutdown => {}
        }
        self.refresh();
    }

    fn handle_selection_change(&mut self, number: usize, selection: &[Arc<Record>]) {
        match self.controller.page() {
            Some(page) if page.number == number => {
                reconcile_selection(page, &mut self.selection, selection)
            }
            Some(page) => log::warn!(
                "dropping selection made on page {number}, page {} is displayed",
                page.number
            ),
            None => log::warn!("selection change without a loaded page"),
        }
    }

    fn handle_bulk_select(&mut self) {
        let records = self.controller.records();
        match self.dialog.confirm(records, &mut self.selection) {
            Ok(taken) => log::info!("selected first {taken} rows of the page"),
            Err(err) => log::debug!("bulk select rejected: {err}"),
        }
    }

    /// Derive the view's input from the current page and selection.
    pub fn props(&self) -> TableProps {
        let selection = self
            .controller
            .page()
            .map(|page| view_selection(page, &self.selection))
            .unwrap_or_default();
        let dialog = self.dialog.is_visible().then(|| DialogProps {
            input: self.dialog.input().to_string(),
            can_confirm: self.dialog.can_confirm(),
        });
        TableProps {
            rows: self.controller.records().to_vec(),
            total_records: self.controller.total_count(),
            loading: self.controller.is_loading(),
            first: self.controller.first(),
            rows_page: self.controller.page().map(|page| page.number),
            selection,
            selected_count: self.selection.count(),
            page_number: self.controller.current_page_number(),
            total_pages: self.controller.total_pages(),
            rows_per_page: self.controller.rows_per_page(),
            dialog,
            error: self.controller.error().map(ToString::to_string),
        }
    }

    fn refresh(&mut self) {
        let props = self.props();
        self.view.render(&props);
    }
}
