//! SEC EDGAR API client with rate limiting and bounded retries.

use crate::error::{DataError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// SEC EDGAR API base URL
pub const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// User agent for SEC EDGAR requests (SEC requires identifying information)
const USER_AGENT: &str = "Contrail-AirlineComparison/0.1 (contact@example.com)";

/// EDGAR client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgarConfig {
    /// Identifying user agent sent with every request
    pub user_agent: String,
    /// Base URL of the data API
    pub base_url: String,
    /// Minimum spacing between requests
    #[serde(with = "millis")]
    pub rate_limit: Duration,
    /// Per-request timeout
    #[serde(with = "millis")]
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry
    #[serde(with = "millis")]
    pub retry_delay: Duration,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            base_url: EDGAR_BASE_URL.to_string(),
            rate_limit: DEFAULT_RATE_LIMIT,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl EdgarConfig {
    /// Backoff before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// Outcome of one request attempt.
enum Attempt<T> {
    Done(T),
    Retry(String),
}

/// SEC EDGAR API client with rate limiting
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    config: EdgarConfig,
}

impl EdgarClient {
    /// Create a new EDGAR client with default settings (10 req/sec)
    pub fn new() -> Result<Self> {
        Self::with_config(EdgarConfig::default())
    }

    /// Create a new EDGAR client with custom rate limit
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        Self::with_config(EdgarConfig {
            rate_limit: min_interval,
            ..EdgarConfig::default()
        })
    }

    /// Create a client from explicit settings.
    ///
    /// # Example
    /// ```no_run
    /// use contrail_data::edgar::{EdgarClient, EdgarConfig};
    ///
    /// # fn example() -> contrail_data::Result<()> {
    /// let client = EdgarClient::with_config(EdgarConfig {
    ///     user_agent: "Example Research research@example.com".to_string(),
    ///     max_retries: 5,
    ///     ..EdgarConfig::default()
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config.rate_limit))),
            config,
        })
    }

    /// Client settings.
    pub const fn config(&self) -> &EdgarConfig {
        &self.config
    }

    /// Fetch a JSON document under the base URL.
    ///
    /// Network failures, HTTP 429 and 5xx responses are retried up to
    /// `max_retries` times with exponential backoff. Other HTTP errors and
    /// malformed bodies fail immediately.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::RetriesExhausted`] once every attempt has failed.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url, path.trim_start_matches('/'));
        let attempts = self.config.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = self.config.backoff(attempt - 1);
                warn!(
                    url = %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "Retrying EDGAR request"
                );
                sleep(delay).await;
            }

            match self.try_get(&url).await? {
                Attempt::Done(body) => {
                    debug!(url = %url, attempt, "EDGAR request succeeded");
                    return serde_json::from_str(&body).map_err(|e| {
                        DataError::EdgarApi(format!("Failed to parse {url}: {e}"))
                    });
                }
                Attempt::Retry(error) => last_error = error,
            }
        }

        Err(DataError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    async fn try_get(&self, url: &str) -> Result<Attempt<String>> {
        self.rate_limiter.lock().await.wait().await;

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retry(e.to_string())),
        };

        let status = response.status();
        if status.is_success() {
            return match response.text().await {
                Ok(body) => Ok(Attempt::Done(body)),
                Err(e) => Ok(Attempt::Retry(e.to_string())),
            };
        }
        if status.as_u16() == 429 || status.is_server_error() {
            return Ok(Attempt::Retry(format!("HTTP {status}")));
        }

        Err(DataError::Http(format!("{url}: HTTP {status}")))
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let config = EdgarConfig {
            retry_delay: Duration::from_millis(100),
            ..EdgarConfig::default()
        };
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: EdgarConfig =
            serde_json::from_str(r#"{"max_retries": 1, "retry_delay": 250}"#).unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(config.base_url, EDGAR_BASE_URL);
    }

    #[tokio::test]
    async fn test_custom_rate_limit() {
        let client = EdgarClient::with_rate_limit(Duration::from_millis(50)).unwrap();
        assert_eq!(client.config().rate_limit, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_retries() {
        let client = EdgarClient::with_config(EdgarConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            rate_limit: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
            max_retries: 1,
            retry_delay: Duration::from_millis(1),
            ..EdgarConfig::default()
        })
        .unwrap();

        let result: Result<serde_json::Value> = client.get_json("submissions/x.json").await;
        assert!(matches!(
            result,
            Err(DataError::RetriesExhausted { attempts: 2, .. })
        ));
    }
}
