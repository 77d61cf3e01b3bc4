use std::{fmt::Display, thread, time::Duration};

use serde::de::DeserializeOwned;
use ureq::{
    http::{Response, StatusCode},
    Agent, Body,
};
use url::Url;

use crate::{
    error::Error,
    page::{Page, PageResponse},
};

pub const DEFAULT_API_BASE: &str = "https://api.artic.edu";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const ARTWORKS_PATH: &str = "api/v1/artworks";
const ARTWORK_FIELDS: &str =
    "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";
const MAX_RATE_LIMIT_RETRIES: usize = 3;
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Source of pages for a table.  Called from worker threads.
pub trait PageFetcher: Send + Sync {
    /// Fetch page `number` (1-based) with its pagination metadata.
    fn fetch_page(&self, number: usize) -> Result<Page, Error>;
}

pub struct WebApi {
    agent: Agent,
    base: Url,
}

impl WebApi {
    pub fn new(api_base: &str, proxy_url: Option<&str>, timeout: Duration) -> Result<Self, Error> {
        let mut agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false);
        if let Some(proxy_url) = proxy_url {
            match ureq::Proxy::new(proxy_url) {
                Ok(proxy) => agent = agent.proxy(Some(proxy)),
                Err(err) => log::error!("invalid proxy URL {proxy_url:?}: {err}"),
            }
        }
        Ok(Self {
            agent: agent.build().into(),
            base: Url::parse(api_base)?,
        })
    }

    fn request(&self, request: &RequestBuilder) -> Result<Response<Body>, Error> {
        let url = request.build(&self.base)?;
        log::debug!("GET {url}");
        let response = self
            .agent
            .get(url.as_str())
            .header("Accept", "application/json")
            .call()?;
        Ok(response)
    }

    fn with_retry(f: impl Fn() -> Result<Response<Body>, Error>) -> Result<Response<Body>, Error> {
        let mut retries = 0;
        loop {
            let response = f()?;
            if response.status() == StatusCode::TOO_MANY_REQUESTS
                && retries < MAX_RATE_LIMIT_RETRIES
            {
                retries += 1;
                let secs = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|secs| secs.to_str().ok())
                    .and_then(|secs| secs.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                log::warn!("rate limited, retrying in {secs}s");
                thread::sleep(Duration::from_secs(secs));
            } else {
                break Ok(response);
            }
        }
    }

    /// Send a GET request and return the deserialized JSON body.
    fn load<T: DeserializeOwned>(&self, request: &RequestBuilder) -> Result<T, Error> {
        let mut response = Self::with_retry(|| self.request(request))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::WebApiError(format!(
                "{} responded with {status}",
                request.path
            )));
        }
        response
            .body_mut()
            .read_json()
            .map_err(|err| Error::UnexpectedResponse(err.to_string()))
    }
}

/// Artwork endpoints.
impl WebApi {
    pub fn get_artworks_page(&self, number: usize) -> Result<Page, Error> {
        let request = RequestBuilder::new(ARTWORKS_PATH)
            .query("page", number)
            .query("fields", ARTWORK_FIELDS);
        let response: PageResponse = self.load(&request)?;
        Ok(Page::from_response(number, response))
    }
}

impl PageFetcher for WebApi {
    fn fetch_page(&self, number: usize) -> Result<Page, Error> {
        self.get_artworks_page(number)
    }
}

#[derive(Debug, Clone)]
struct RequestBuilder {
    path: String,
    queries: Vec<(String, String)>,
}

impl RequestBuilder {
    fn new(path: impl Display) -> Self {
        Self {
            path: path.to_string(),
            queries: Vec::new(),
        }
    }

    fn query(mut self, key: impl Display, value: impl Display) -> Self {
        self.queries.push((key.to_string(), value.to_string()));
        self
    }

    fn build(&self, base: &Url) -> Result<Url, Error> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base.join(&self.path)?;
        if !self.queries.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.queries {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
