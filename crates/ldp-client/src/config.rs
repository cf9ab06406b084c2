//! pod client config

use std::time::Duration;

/// Pod client config.
#[derive(Debug, Clone)]
pub struct PodConfig {
    /// pod base url
    pub pod_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// transport-level retries for write requests, 0 means single attempt
    pub max_retries: u32,
    /// delay between retry attempts
    pub retry_delay: Duration,
}

impl PodConfig {
    /// create new pod config with default parameters.
    pub fn new(pod_url: impl Into<String>) -> Self {
        Self {
            pod_url: pod_url.into(),
            request_timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// set retry policy for write requests.
    ///
    /// Retries apply to transport-level failures only; a pod that answers
    /// with an unexpected status code is never asked again. The default is a
    /// single attempt.
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}
