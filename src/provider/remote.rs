/*!
 * Remote generative translation client.
 *
 * HTTP client for the hosted adaptation service. The service performs the
 * actual memory-vs-generation blending; this client is transport only, with
 * bounded retries and exponential backoff on transient failures.
 */

use anyhow::Result;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{AnalysisDetail, AnalysisRequest, GenerativeTranslator, TranslateRequest};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::leverage::result::LeverageResult;

/// Client for the remote adaptation service
#[derive(Debug)]
pub struct RemoteTranslator {
    /// HTTP client for API requests
    client: Client,
    /// Service endpoint URL
    endpoint: Url,
    /// Optional API key for authentication
    api_key: Option<String>,
    /// Model identifier sent with every request
    model: String,
    /// Maximum number of retries for transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Wire shape of a translate call
#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    request: &'a TranslateRequest,
}

/// Wire shape of an analysis call
#[derive(Debug, Serialize)]
struct AnalyzeBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    request: &'a AnalysisRequest,
}

/// Error payload returned by the service
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl RemoteTranslator {
    /// Create a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, ProviderError> {
        self.endpoint
            .join(path)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid URL path: {}", e)))
    }

    /// POST a JSON body with retry on network errors and server errors.
    ///
    /// Client errors (4xx) fail fast; 429 maps to a rate-limit error so
    /// callers can distinguish throttling from hard failures.
    async fn post_with_retry<B, T>(&self, url: Url, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let mut attempt: u32 = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            let mut request = self.client.post(url.clone()).json(body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let text = response.text().await.map_err(|e| {
                            ProviderError::RequestFailed(format!(
                                "Failed to read response body: {}",
                                e
                            ))
                        })?;
                        return serde_json::from_str::<T>(&text)
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }

                    let message = response
                        .text()
                        .await
                        .ok()
                        .and_then(|t| serde_json::from_str::<ApiErrorBody>(&t).ok())
                        .and_then(|b| b.message)
                        .unwrap_or_else(|| format!("HTTP {}", status));

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        // Rate limited - retryable
                        warn!(
                            "Adaptation service rate limited: {} - attempt {}/{}",
                            message,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::RateLimitExceeded(message));
                    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
                    {
                        return Err(ProviderError::AuthenticationError(message));
                    } else if status.is_server_error() {
                        // Server error - can retry
                        error!(
                            "Adaptation service error ({}): {} - attempt {}/{}",
                            status,
                            message,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        // Client error - don't retry
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "Adaptation service network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                debug!("Backing off {} ms before retry", backoff_ms);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

#[async_trait::async_trait]
impl GenerativeTranslator for RemoteTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<LeverageResult, ProviderError> {
        let url = self.url_for("translate")?;
        let body = TranslateBody {
            model: &self.model,
            request: &request,
        };
        self.post_with_retry(url, &body).await
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisDetail, ProviderError> {
        let url = self.url_for("analyze")?;
        let body = AnalyzeBody {
            model: &self.model,
            request: &request,
        };
        self.post_with_retry(url, &body).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
