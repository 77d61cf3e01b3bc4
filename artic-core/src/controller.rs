use std::{sync::Arc, thread};

use crossbeam_channel::Sender;

use crate::{
    error::Error,
    page::{first_offset, Page},
    promise::{Promise, PromiseState},
    record::Record,
    webapi::PageFetcher,
};

/// Result of a page fetch, posted back to the thread that owns the
/// controller.
#[derive(Debug)]
pub struct PageLoaded {
    pub number: usize,
    pub result: Result<Page, Error>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error,
}

impl From<PromiseState> for LoadState {
    fn from(state: PromiseState) -> Self {
        match state {
            PromiseState::Empty => Self::Idle,
            PromiseState::Deferred => Self::Loading,
            PromiseState::Resolved => Self::Loaded,
            PromiseState::Rejected => Self::Error,
        }
    }
}

/// Drives page fetches and holds the page on display.
///
/// Only the most recently requested page is ever applied.  A failed fetch
/// keeps the previously displayed page and total.
pub struct PageController {
    fetcher: Arc<dyn PageFetcher>,
    request: Promise<usize, usize>,
    requested: Option<usize>,
    page: Option<Page>,
    total_count: usize,
    rows_per_page: usize,
}

impl PageController {
    pub fn new(fetcher: Arc<dyn PageFetcher>, rows_per_page: usize) -> Self {
        Self {
            fetcher,
            request: Promise::Empty,
            requested: None,
            page: None,
            total_count: 0,
            rows_per_page,
        }
    }

    pub fn state(&self) -> LoadState {
        self.request.state().into()
    }

    pub fn is_loading(&self) -> bool {
        self.state() == LoadState::Loading
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        self.page
            .as_ref()
            .map(|page| page.records.as_slice())
            .unwrap_or_default()
    }

    pub fn requested_page(&self) -> Option<usize> {
        self.requested
    }

    /// Page the paginator should point at: the pending one while loading,
    /// the displayed one otherwise.
    pub fn current_page_number(&self) -> usize {
        match (self.state(), &self.page) {
            (LoadState::Loading, _) | (_, None) => self.requested.unwrap_or(1),
            (_, Some(page)) => page.number,
        }
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> Option<usize> {
        self.page.as_ref().map(|page| page.total_pages)
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn first(&self) -> usize {
        first_offset(self.current_page_number(), self.rows_per_page)
    }

    pub fn error(&self) -> Option<&Error> {
        self.request.rejection()
    }

    /// Ask for page `number` (1-based).  Returns whether a fetch was started.
    pub fn request_page<M>(&mut self, number: usize, sender: &Sender<M>) -> bool
    where
        M: From<PageLoaded> + Send + 'static,
    {
        if number == 0 {
            log::warn!("ignoring request for page 0");
            return false;
        }
        if let Some(total_pages) = self.total_pages() {
            if number > total_pages {
                log::warn!("ignoring request for page {number} of {total_pages}");
                return false;
            }
        }
        if self.requested == Some(number) && !self.request.is_rejected() {
            return false;
        }
        self.fetch(number, sender);
        true
    }

    /// Fetch the last requested page again.
    pub fn retry<M>(&mut self, sender: &Sender<M>) -> bool
    where
        M: From<PageLoaded> + Send + 'static,
    {
        match self.requested {
            Some(number) => {
                self.fetch(number, sender);
                true
            }
            None => false,
        }
    }

    fn fetch<M>(&mut self, number: usize, sender: &Sender<M>)
    where
        M: From<PageLoaded> + Send + 'static,
    {
        log::info!("loading page {number}");
        self.requested = Some(number);
        self.request.defer(number);

        let fetcher = self.fetcher.clone();
        let sender = sender.clone();
        thread::spawn(move || {
            let result = fetcher.fetch_page(number);
            if sender.send(PageLoaded { number, result }.into()).is_err() {
                log::debug!("page {number} loaded after the table went away");
            }
        });
    }

    /// Apply a finished fetch.  Returns false if the result is stale and was
    /// dropped.
    pub fn handle_loaded(&mut self, loaded: PageLoaded) -> bool {
        let PageLoaded { number, result } = loaded;
        let outcome = result.as_ref().map(|_| number).map_err(Clone::clone);
        if !self.request.update((number, outcome)) {
            log::warn!("dropping stale result for page {number}");
            return false;
        }
        match result {
            Ok(page) => {
                self.total_count = page.total_count;
                self.page = Some(page);
            }
            Err(err) => {
                log::error!("failed to load page {number}: {err}");
            }
        }
        true
    }
}
