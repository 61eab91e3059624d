//! Link creation, listing, and redirect resolution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::title_fetcher::TitleFetcher;
use crate::utils::code_generator::{MAX_CODE_LEN, MIN_CODE_LEN, code_with_length};
use crate::utils::url_validator::validate_url;

/// Service for creating and resolving shortened links.
///
/// Handles URL validation, deduplication, deterministic code derivation, and
/// the best-effort title fetch.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    title_fetcher: Arc<dyn TitleFetcher>,
    base_url: String,
    title_timeout: Duration,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `links` - link repository for DB operations
    /// - `title_fetcher` - collaborator retrieving remote page titles
    /// - `base_url` - this shortener's own origin, stored on every record
    /// - `title_timeout` - upper bound on how long link creation waits for a title
    pub fn new(
        links: Arc<dyn LinkRepository>,
        title_fetcher: Arc<dyn TitleFetcher>,
        base_url: String,
        title_timeout: Duration,
    ) -> Self {
        Self {
            links,
            title_fetcher,
            base_url,
            title_timeout,
        }
    }

    /// Creates a short link, or returns the existing one for an already
    /// submitted URL.
    ///
    /// # Deduplication
    ///
    /// The code is a pure function of the URL, so re-submission finds the
    /// existing record by URL and returns it without touching the title
    /// fetcher or the code generator.
    ///
    /// # Title fetch
    ///
    /// Best-effort and time-bounded: a slow or failing remote page yields a
    /// link without a title, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for input that does not parse as an
    /// absolute http(s) URL (the status this service's clients expect for
    /// invalid input). Returns [`AppError::Internal`] on database errors.
    pub async fn create_link(&self, url: &str) -> Result<Link, AppError> {
        let url = validate_url(url).map_err(|e| {
            AppError::not_found("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.links.find_by_url(&url).await? {
            return Ok(existing);
        }

        let code = self.derive_free_code(&url).await?;
        let title = self.fetch_title_best_effort(&url).await;

        self.links
            .create(NewLink {
                url,
                code,
                title,
                base_url: self.base_url.clone(),
            })
            .await
    }

    /// Lists all links in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.links.list_all().await
    }

    /// Resolves a short code for a redirect, counting the visit.
    ///
    /// The increment is checked: a zero-row update is reported instead of
    /// silently dropping the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Internal`] on database errors or a lost increment.
    pub async fn visit(&self, code: &str) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        let updated = self.links.increment_visits(code).await?;
        if !updated {
            return Err(AppError::internal(
                "Failed to record visit",
                json!({ "code": code }),
            ));
        }

        Ok(link.url)
    }

    /// Derives the shortest free code for a URL.
    ///
    /// Starts at the default 5-hex-char prefix of the URL digest. When the
    /// prefix is held by a different URL, extends it one character at a time
    /// (longer prefixes of the same digest) until a free code is found.
    async fn derive_free_code(&self, url: &str) -> Result<String, AppError> {
        for len in MIN_CODE_LEN..=MAX_CODE_LEN {
            let code = code_with_length(url, len);

            match self.links.find_by_code(&code).await? {
                None => return Ok(code),
                // A concurrent request just inserted this URL; the upsert in
                // the create path will converge on that row.
                Some(existing) if existing.url == url => return Ok(code),
                Some(_) => continue,
            }
        }

        Err(AppError::internal(
            "Failed to derive unique code",
            json!({ "reason": "Digest exhausted by collisions" }),
        ))
    }

    /// Fetches the remote page title, bounded by the configured timeout.
    async fn fetch_title_best_effort(&self, url: &str) -> Option<String> {
        match tokio::time::timeout(self.title_timeout, self.title_fetcher.fetch_title(url)).await {
            Ok(Ok(title)) => title,
            Ok(Err(e)) => {
                tracing::warn!("title fetch for {url} failed: {e}");
                None
            }
            Err(_) => {
                tracing::warn!(
                    "title fetch for {url} timed out after {:?}",
                    self.title_timeout
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::title_fetcher::{MockTitleFetcher, TitleFetchError};
    use crate::utils::code_generator::generate_code;
    use chrono::Utc;

    const BASE_URL: &str = "https://s.example.com";

    fn test_link(code: &str, url: &str) -> Link {
        Link {
            id: 1,
            url: url.to_string(),
            code: code.to_string(),
            title: Some("Example Domain".to_string()),
            base_url: BASE_URL.to_string(),
            visits: 0,
            created_at: Utc::now(),
        }
    }

    fn service(links: MockLinkRepository, titles: MockTitleFetcher) -> LinkService {
        LinkService::new(
            Arc::new(links),
            Arc::new(titles),
            BASE_URL.to_string(),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut links = MockLinkRepository::new();
        let mut titles = MockTitleFetcher::new();

        links
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));
        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        titles
            .expect_fetch_title()
            .times(1)
            .returning(|_| Ok(Some("Example Domain".to_string())));

        let expected_code = generate_code("https://example.com/");
        links
            .expect_create()
            .withf(move |new_link| {
                new_link.url == "https://example.com/"
                    && new_link.code == expected_code
                    && new_link.title.as_deref() == Some("Example Domain")
                    && new_link.base_url == BASE_URL
            })
            .times(1)
            .returning(|new_link| {
                let mut link = test_link(&new_link.code, &new_link.url);
                link.title = new_link.title;
                Ok(link)
            });

        let service = service(links, titles);
        let link = service.create_link("https://example.com/").await.unwrap();

        assert_eq!(link.url, "https://example.com/");
        assert_eq!(link.code.len(), MIN_CODE_LEN);
        assert_eq!(link.title.as_deref(), Some("Example Domain"));
    }

    #[tokio::test]
    async fn test_create_link_returns_existing_record() {
        let mut links = MockLinkRepository::new();
        // No title fetch and no create: dedup short-circuits.
        let titles = MockTitleFetcher::new();

        let existing = test_link("8a83f", "http://roflzoo.com/");
        links
            .expect_find_by_url()
            .withf(|url| url == "http://roflzoo.com/")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let service = service(links, titles);
        let link = service.create_link("http://roflzoo.com/").await.unwrap();

        assert_eq!(link.code, "8a83f");
    }

    #[tokio::test]
    async fn test_create_link_rejects_invalid_url_before_any_store_call() {
        // No expectations: any repository or fetcher call fails the test.
        let links = MockLinkRepository::new();
        let titles = MockTitleFetcher::new();

        let service = service(links, titles);
        let result = service.create_link("definitely not a valid url").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_link_proceeds_without_title_on_fetch_failure() {
        let mut links = MockLinkRepository::new();
        let mut titles = MockTitleFetcher::new();

        links
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));
        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        titles
            .expect_fetch_title()
            .times(1)
            .returning(|_| Err(TitleFetchError::Status(503)));

        links
            .expect_create()
            .withf(|new_link| new_link.title.is_none())
            .times(1)
            .returning(|new_link| {
                let mut link = test_link(&new_link.code, &new_link.url);
                link.title = None;
                Ok(link)
            });

        let service = service(links, titles);
        let link = service.create_link("https://example.com/").await.unwrap();

        assert!(link.title.is_none());
    }

    #[tokio::test]
    async fn test_create_link_proceeds_without_title_when_fetch_is_slow() {
        use async_trait::async_trait;

        // Never errors, just takes far longer than the configured bound.
        struct SlowTitleFetcher;

        #[async_trait]
        impl TitleFetcher for SlowTitleFetcher {
            async fn fetch_title(&self, _url: &str) -> Result<Option<String>, TitleFetchError> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Some("too late".to_string()))
            }
        }

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));
        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        links
            .expect_create()
            .withf(|new_link| new_link.title.is_none())
            .times(1)
            .returning(|new_link| {
                let mut link = test_link(&new_link.code, &new_link.url);
                link.title = None;
                Ok(link)
            });

        let service = LinkService::new(
            Arc::new(links),
            Arc::new(SlowTitleFetcher),
            BASE_URL.to_string(),
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        let link = service.create_link("https://example.com/").await.unwrap();

        assert!(link.title.is_none());
        // The response must not wait out the slow fetch.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_create_link_extends_code_on_collision() {
        let mut links = MockLinkRepository::new();
        let mut titles = MockTitleFetcher::new();

        let url = "https://example.com/";
        let short_code = code_with_length(url, MIN_CODE_LEN);
        let longer_code = code_with_length(url, MIN_CODE_LEN + 1);

        links
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));

        // The 5-char prefix is held by a different URL; the 6-char one is free.
        let squatter = test_link(&short_code, "https://other.example.com/");
        links
            .expect_find_by_code()
            .withf(move |code| code == short_code)
            .times(1)
            .returning(move |_| Ok(Some(squatter.clone())));
        links
            .expect_find_by_code()
            .withf({
                let longer_code = longer_code.clone();
                move |code| code == longer_code
            })
            .times(1)
            .returning(|_| Ok(None));

        titles
            .expect_fetch_title()
            .times(1)
            .returning(|_| Ok(None));

        links
            .expect_create()
            .withf({
                let longer_code = longer_code.clone();
                move |new_link| new_link.code == longer_code
            })
            .times(1)
            .returning(|new_link| Ok(test_link(&new_link.code, &new_link.url)));

        let service = service(links, titles);
        let link = service.create_link(url).await.unwrap();

        assert_eq!(link.code.len(), MIN_CODE_LEN + 1);
    }

    #[tokio::test]
    async fn test_visit_increments_and_returns_url() {
        let mut links = MockLinkRepository::new();
        let titles = MockTitleFetcher::new();

        let link = test_link("8a83f", "http://roflzoo.com/");
        links
            .expect_find_by_code()
            .withf(|code| code == "8a83f")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        links
            .expect_increment_visits()
            .withf(|code| code == "8a83f")
            .times(1)
            .returning(|_| Ok(true));

        let service = service(links, titles);
        let url = service.visit("8a83f").await.unwrap();

        assert_eq!(url, "http://roflzoo.com/");
    }

    #[tokio::test]
    async fn test_visit_unknown_code_is_not_found() {
        let mut links = MockLinkRepository::new();
        let titles = MockTitleFetcher::new();

        links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        // increment_visits must not be called for a missing link.

        let service = service(links, titles);
        let result = service.visit("zzzzz").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_visit_lost_increment_is_surfaced() {
        let mut links = MockLinkRepository::new();
        let titles = MockTitleFetcher::new();

        let link = test_link("8a83f", "http://roflzoo.com/");
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        links
            .expect_increment_visits()
            .times(1)
            .returning(|_| Ok(false));

        let service = service(links, titles);
        let result = service.visit("8a83f").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_list_links_passes_through() {
        let mut links = MockLinkRepository::new();
        let titles = MockTitleFetcher::new();

        links.expect_list_all().times(1).returning(|| {
            Ok(vec![
                test_link("aaaaa", "https://one.example.com/"),
                test_link("bbbbb", "https://two.example.com/"),
            ])
        });

        let service = service(links, titles);
        let all = service.list_links().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "aaaaa");
    }
}
