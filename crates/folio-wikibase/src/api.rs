//! Shared HTTP plumbing: timeouts, status mapping, and bounded retries.

use folio_core::{LookupError, LookupResult, NetworkConfig};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection behavior shared by every client in this crate.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub timeout: Duration,
    /// Retries after the first attempt, spent on retryable failures only.
    pub retries: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl ApiClientConfig {
    pub fn from_network(network: &NetworkConfig) -> Self {
        Self {
            timeout: Duration::from_secs(network.timeout_secs),
            retries: network.retries,
            retry_delay: Duration::from_millis(network.retry_delay_ms),
            user_agent: network.user_agent.clone(),
        }
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from_network(&NetworkConfig::default())
    }
}

pub(crate) fn map_reqwest_error(error: reqwest::Error) -> LookupError {
    if error.is_decode() {
        LookupError::Decode(error.to_string())
    } else {
        LookupError::Transport(error.to_string())
    }
}

pub(crate) fn check_status(response: reqwest::Response) -> LookupResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(LookupError::Status {
            code: status.as_u16(),
        })
    }
}

/// Runs `call` until it succeeds, fails unretryably, or the retry budget is
/// spent.
pub(crate) async fn with_retries<T, F, Fut>(
    config: &ApiClientConfig,
    operation: &str,
    mut call: F,
) -> LookupResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LookupResult<T>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(operation, attempt, "lookup recovered after retry");
                }
                return Ok(value);
            }
            Err(error) if error.is_retryable() && attempt < config.retries => {
                attempt += 1;
                warn!(operation, attempt, error = %error, "lookup failed, retrying");
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
