//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - HEAD requests with GET fallback for links that are only checked
//! - GET requests and link extraction for pages that are scanned
//! - Outcome classification
//!
//! The fetcher never touches shared crawl state. All bookkeeping belongs to
//! the coordinator.

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Maximum redirects followed before a link is classified as an error
const MAX_REDIRECTS: usize = 10;

/// Result of checking one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Success status after redirects were followed
    Reachable {
        /// HTTP status code
        status_code: u16,
        /// Outbound links found on the page, as written (empty unless the
        /// page was scanned and turned out to be HTML)
        links: Vec<String>,
    },

    /// HTTP 4xx or 5xx
    Broken {
        /// HTTP status code
        status_code: u16,
    },

    /// The request exceeded its timeout
    TimedOut,

    /// Any other transport failure (DNS, connection refused, TLS, ...)
    Error {
        /// Error description
        detail: String,
    },
}

impl FetchOutcome {
    /// Classifies a received HTTP status
    ///
    /// Redirects are followed by the client, so a 3xx reaching this point
    /// means the redirect could not be resolved further (for example a
    /// `304` or a redirect without `Location`); the server still answered
    /// for the link, so it counts as reachable.
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_client_error() || status.is_server_error() {
            Self::Broken {
                status_code: status.as_u16(),
            }
        } else {
            Self::Reachable {
                status_code: status.as_u16(),
                links: Vec::new(),
            }
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Reachable { status_code, .. } | Self::Broken { status_code } => {
                Some(*status_code)
            }
            Self::TimedOut | Self::Error { .. } => None,
        }
    }

    /// Outbound links carried by this outcome
    pub fn links(&self) -> &[String] {
        match self {
            Self::Reachable { links, .. } => links,
            _ => &[],
        }
    }
}

/// A single-URL checker
///
/// The coordinator is generic over this trait so crawls can run against an
/// in-process fake as easily as against the network.
pub trait Fetch: Send + Sync + 'static {
    /// Checks `url`, giving up after `timeout`
    ///
    /// When `scan` is true and the response is HTML, the outcome carries the
    /// page's outbound links.
    fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
        scan: bool,
    ) -> impl Future<Output = FetchOutcome> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_ripple::config::UserAgentConfig;
/// use link_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "link-ripple".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: Some("https://example.com/bot".to_string()),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetch`] implementation
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a page with GET, extracting links if `scan` is set
    async fn get(&self, url: &Url, timeout: Duration, scan: bool) -> FetchOutcome {
        let response = match self.client.get(url.clone()).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let outcome = FetchOutcome::from_status(response.status());
        if !scan || !matches!(outcome, FetchOutcome::Reachable { .. }) || !is_html(&response) {
            return outcome;
        }

        let status_code = response.status().as_u16();
        // Links on a redirected page are relative to where it ended up
        let final_url = response.url().clone();

        match response.text().await {
            Ok(body) => {
                let parsed = parse_html(&body);
                tracing::trace!(
                    "Parsed {} ({:?}): {} links",
                    final_url,
                    parsed.title,
                    parsed.links.len()
                );
                FetchOutcome::Reachable {
                    status_code,
                    links: resolve_against(&parsed.outbound_links(&final_url), &final_url, url),
                }
            }
            Err(e) => classify_error(&e),
        }
    }

    /// Checks with HEAD, falling back to GET when the server seems to reject it
    ///
    /// Both requests share one deadline of `timeout`.
    async fn head(&self, url: &Url, timeout: Duration) -> FetchOutcome {
        let deadline = Instant::now() + timeout;
        match self.client.head(url.clone()).timeout(timeout).send().await {
            Ok(response) => match FetchOutcome::from_status(response.status()) {
                reachable @ FetchOutcome::Reachable { .. } => reachable,
                broken => {
                    tracing::trace!(
                        "HEAD {} returned {:?}, retrying with GET",
                        url,
                        broken.status_code()
                    );
                    self.get_before(url, deadline).await
                }
            },
            Err(e) if e.is_timeout() => FetchOutcome::TimedOut,
            Err(e) => {
                tracing::trace!("HEAD {} failed ({}), retrying with GET", url, e);
                self.get_before(url, deadline).await
            }
        }
    }

    /// GET fallback with whatever is left of the check's time budget
    async fn get_before(&self, url: &Url, deadline: Instant) -> FetchOutcome {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return FetchOutcome::TimedOut;
        }
        self.get(url, remaining, false).await
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration, scan: bool) -> FetchOutcome {
        if scan {
            self.get(url, timeout, true).await
        } else {
            self.head(url, timeout).await
        }
    }
}

/// Returns true if the response declares an HTML body
fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        })
        .unwrap_or(false)
}

/// Makes relative links absolute when the page was served from a redirect
///
/// The coordinator resolves links against the URL it asked for; after a
/// redirect that is the wrong base, so such links are resolved here.
fn resolve_against(links: &[String], final_url: &Url, requested: &Url) -> Vec<String> {
    if final_url == requested {
        return links.to_vec();
    }

    links
        .iter()
        .map(|link| {
            final_url
                .join(link)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| link.clone())
        })
        .collect()
}

/// Classifies a transport failure
fn classify_error(error: &reqwest::Error) -> FetchOutcome {
    if error.is_timeout() {
        return FetchOutcome::TimedOut;
    }

    let message = error.to_string();
    let lower = format!("{:?}", error).to_ascii_lowercase();

    let detail = if error.is_redirect() {
        "Too many redirects".to_string()
    } else if lower.contains("dns") || lower.contains("failed to lookup address") {
        "Could not resolve hostname".to_string()
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        format!("TLS error: {}", message)
    } else if error.is_connect() {
        "Connection failed".to_string()
    } else {
        message
    };

    FetchOutcome::Error { detail }
}
