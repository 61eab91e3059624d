//! Best-effort retrieval of remote page titles.
//!
//! Link creation asks the target page for its `<title>` so the listing page
//! has something readable to show. The fetch is advisory: the link service
//! bounds it with a timeout and proceeds without a title on any failure.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Errors that can occur while fetching a page title.
#[derive(Debug, thiserror::Error)]
pub enum TitleFetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Remote returned status {0}")]
    Status(u16),
}

/// Collaborator that retrieves the HTML title of a remote page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleFetcher: Send + Sync {
    /// Fetches the page at `url` and extracts its `<title>` text.
    ///
    /// Returns `Ok(None)` when the page has no usable title.
    async fn fetch_title(&self, url: &str) -> Result<Option<String>, TitleFetchError>;
}

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid")
});

/// [`TitleFetcher`] backed by an HTTP client.
pub struct HttpTitleFetcher {
    client: reqwest::Client,
}

impl HttpTitleFetcher {
    /// Creates a fetcher with its own connection pool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TitleFetcher for HttpTitleFetcher {
    async fn fetch_title(&self, url: &str) -> Result<Option<String>, TitleFetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TitleFetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;

        Ok(extract_title(&body))
    }
}

/// Pulls the first `<title>` text out of an HTML document.
///
/// Whitespace is collapsed and common entities are unescaped. Returns `None`
/// for missing or empty titles.
fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = unescape_entities(&collapsed);

    if title.is_empty() { None } else { Some(title) }
}

fn unescape_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
