//! Dataset sources: where dataset bytes come from.

use std::{io, time::Duration};

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::TransportError;

/// Fetches raw dataset bytes by location.
///
/// Implementations are polled on the caller's task and need not be `Send`.
#[async_trait(?Send)]
pub trait DatasetSource {
    /// Fetch the full contents of `location`.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, TransportError>;
}

#[async_trait(?Send)]
impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(location).await
    }
}

/// Error type for [`HttpDatasetSource`] construction failures.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL did not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[source] url::ParseError),
}

/// Default user agent for dataset requests.
pub const DEFAULT_USER_AGENT: &str = "tunisia-navigator/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpDatasetSource`].
#[derive(Debug, Clone)]
pub struct HttpDatasetSourceConfig {
    /// Base URL dataset locations are resolved against.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpDatasetSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpDatasetSourceConfig {
    /// Create a configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches datasets over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpDatasetSource {
    /// Create a source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpDatasetSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: HttpDatasetSourceConfig) -> Result<Self, SourceBuildError> {
        let base_url = directory_url(&config.base_url).map_err(SourceBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Base URL locations are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, location: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(location.trim_start_matches('/'))
            .map_err(|source| TransportError::InvalidUrl {
                location: location.to_owned(),
                source,
            })
    }

    fn convert_reqwest_error(&self, error: reqwest::Error, url: &Url) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                location: url.to_string(),
                timeout: self.timeout,
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                location: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            location: url.to_string(),
            source: io::Error::other(error),
        }
    }
}

#[async_trait(?Send)]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.resolve(location)?;
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &url))?;
        Ok(body.to_vec())
    }
}

/// Parse `raw` and make sure its path ends in `/` so relative joins keep
/// the last segment.
fn directory_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::block_on_for_tests;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[rstest]
    #[case("http://example.com", "data/sector-data.json", "http://example.com/data/sector-data.json")]
    #[case("http://example.com/app", "data/a.csv", "http://example.com/app/data/a.csv")]
    #[case("http://example.com/app/", "/data/a.csv", "http://example.com/app/data/a.csv")]
    fn locations_resolve_under_the_base(
        #[case] base: &str,
        #[case] location: &str,
        #[case] expected: &str,
    ) {
        let source = HttpDatasetSource::new(base).expect("source should build");
        let url = source.resolve(location).expect("location should join");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = HttpDatasetSource::new("not a url").expect_err("should fail");
        assert!(matches!(err, SourceBuildError::BaseUrl(_)));
        assert!(err.to_string().starts_with("invalid base URL"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpDatasetSourceConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    /// Serve a single canned HTTP response and return the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut request = [0_u8; 1024];
            let _read = stream.read(&mut request).await.expect("read request");
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
        });
        format!("http://{addr}/")
    }

    #[rstest]
    fn fetch_returns_the_response_body() {
        block_on_for_tests(async {
            let base = serve_once("200 OK", "{\"tourism\":{}}").await;
            let source = HttpDatasetSource::new(base).expect("source should build");
            let body = source
                .fetch("data/sector-data.json")
                .await
                .expect("fetch should succeed");
            assert_eq!(body, b"{\"tourism\":{}}");
        });
    }

    #[rstest]
    fn error_status_is_reported() {
        block_on_for_tests(async {
            let base = serve_once("404 Not Found", "").await;
            let source = HttpDatasetSource::new(base).expect("source should build");
            let err = source
                .fetch("data/missing.json")
                .await
                .expect_err("404 should fail");
            match err {
                TransportError::Http { status, location, .. } => {
                    assert_eq!(status, 404);
                    assert!(location.ends_with("data/missing.json"));
                }
                other => panic!("expected an HTTP error, got {other:?}"),
            }
        });
    }
}
