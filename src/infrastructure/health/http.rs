//! HTTP health probe

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{HealthError, HealthProbe};

/// Per-attempt request timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Health probe issuing a GET and accepting any 2xx
pub struct HttpHealthProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, url: &str) -> Result<(), HealthError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HealthError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HealthError::Status(status.as_u16()))
        }
    }
}
