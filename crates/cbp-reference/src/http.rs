//! Blocking HTTP access with a bounded retry.

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ReferenceError, Result};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between attempts.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Thin wrapper over a blocking client that retries transient failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| ReferenceError::Network {
                url: String::new(),
                message: error.to_string(),
            })?;
        Ok(Self { client })
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(url)?;
        response.json().map_err(|error| ReferenceError::Decode {
            url: url.to_string(),
            message: error.to_string(),
        })
    }

    pub fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url)?;
        response.text().map_err(|error| ReferenceError::Decode {
            url: url.to_string(),
            message: error.to_string(),
        })
    }

    /// Connection failures and 5xx answers are retried; 4xx answers are not.
    fn send(&self, url: &str) -> Result<Response> {
        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            debug!(url, attempt, "fetching reference data");
            let result = self
                .client
                .get(url)
                .header(
                    USER_AGENT,
                    format!("cbp-validate/{}", env!("CARGO_PKG_VERSION")),
                )
                .send();
            let error = match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status().is_server_error() => ReferenceError::Status {
                    url: url.to_string(),
                    status: response.status().as_u16(),
                },
                Ok(response) => {
                    return Err(ReferenceError::Status {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    });
                }
                Err(error) => ReferenceError::Network {
                    url: url.to_string(),
                    message: error.to_string(),
                },
            };
            warn!(url, attempt, error = %error, "reference data request failed");
            last_error = Some(error);
            if attempt < MAX_ATTEMPTS {
                thread::sleep(RETRY_BACKOFF);
            }
        }
        Err(last_error.unwrap_or_else(|| ReferenceError::Network {
            url: url.to_string(),
            message: "no attempt made".to_string(),
        }))
    }
}
