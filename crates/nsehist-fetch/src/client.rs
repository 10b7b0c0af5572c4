//! HTTP client for the NSE archive.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};

use crate::{
    EquityRow, IndexRow, ParseError, SnapshotSource, SourceError, parse_equity_snapshot,
    parse_index_snapshot,
    url::{EQUITY_ARCHIVE_URL, INDEX_ARCHIVE_URL, equity_url, index_url},
};

/// Configuration for the archive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the equity bhav copy archive.
    pub equity_base_url: String,
    /// Base URL of the index snapshot archive.
    pub index_base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            equity_base_url: EQUITY_ARCHIVE_URL.to_string(),
            index_base_url: INDEX_ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            // The archive rejects non-browser agents
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Snapshot source backed by the NSE archive CSV files.
///
/// Each call issues exactly one GET. A 404 or an empty body means no
/// snapshot was published for the date.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    config: ClientConfig,
}

impl ArchiveClient {
    /// Creates a new archive client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads `url`, returning `Ok(None)` for a missing or empty file.
    async fn download(&self, url: &str) -> Result<Option<Vec<u8>>, SourceError> {
        tracing::trace!(url, "requesting snapshot");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(classify_reqwest_error)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(body.to_vec()))
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> SourceError {
    if err.is_builder() {
        SourceError::Config(err.to_string())
    } else {
        SourceError::Http(err.to_string())
    }
}

fn malformed(err: ParseError) -> SourceError {
    SourceError::Malformed(err.to_string())
}

fn non_empty<T>(rows: Vec<T>) -> Option<Vec<T>> {
    (!rows.is_empty()).then_some(rows)
}

#[async_trait]
impl SnapshotSource for ArchiveClient {
    async fn equity_snapshot(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Vec<EquityRow>>, SourceError> {
        let url = equity_url(&self.config.equity_base_url, date);
        let Some(body) = self.download(&url).await? else {
            return Ok(None);
        };
        let rows = parse_equity_snapshot(&body).await.map_err(malformed)?;
        Ok(non_empty(rows))
    }

    async fn index_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<IndexRow>>, SourceError> {
        let url = index_url(&self.config.index_base_url, date);
        let Some(body) = self.download(&url).await? else {
            return Ok(None);
        };
        let rows = parse_index_snapshot(&body).await.map_err(malformed)?;
        Ok(non_empty(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.equity_base_url, EQUITY_ARCHIVE_URL);
        assert_eq!(config.index_base_url, INDEX_ARCHIVE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = ArchiveClient::with_defaults();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_fatal() {
        let client = ArchiveClient::new(ClientConfig {
            equity_base_url: "not a url".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let err = client.equity_snapshot(date).await.unwrap_err();
        assert!(err.is_fatal(), "{err:?}");
    }
}
