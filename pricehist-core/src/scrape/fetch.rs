//! Page fetching.
//!
//! The PageFetcher trait abstracts the transport so extraction can run
//! against canned HTML in tests.

use crate::error::ScrapeError;
use tracing::debug;

/// Browser-like user agent; the history pages refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0 Safari/537.36";

/// Something that can GET a URL and hand back the body as text.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

impl<F> PageFetcher for F
where
    F: Fn(&str) -> Result<String, ScrapeError>,
{
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self(url)
    }
}

/// Blocking HTTP fetcher. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ScrapeError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {url}");
        let transport = |source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().map_err(transport)
    }
}
