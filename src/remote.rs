use reqwest::{RequestBuilder, Url};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::error::RemoteError;

/// Source of recipe API JSON.
///
/// Implementations resolve with the parsed body on 2xx, and fail with
/// [`RemoteError`] on non-2xx, transport failure or timeout.
pub trait RemoteSource {
    fn fetch_json(&self, url: Url) -> impl Future<Output = Result<Value, RemoteError>> + Send;

    fn send_json(
        &self,
        url: Url,
        payload: Value,
    ) -> impl Future<Output = Result<Value, RemoteError>> + Send;
}

/// HTTP implementation on top of reqwest.
///
/// Every request runs on its own task and is raced against a timer. When the
/// timer wins the task is abandoned, not cancelled: it may still complete in
/// the background, and its result is dropped unseen.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpRemote {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, RemoteError> {
        let pending = tokio::spawn(async move {
            let res = request
                .send()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            let status = res.status();
            let body = res
                .text()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            let parsed = serde_json::from_str::<Value>(&body);

            if !status.is_success() {
                let message = parsed
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("Request failed")
                            .to_string()
                    });
                return Err(RemoteError::Status {
                    message,
                    status: status.as_u16(),
                });
            }

            parsed.map_err(|e| RemoteError::Decode(e.to_string()))
        });

        match tokio::time::timeout(self.timeout, pending).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RemoteError::Transport(join_error.to_string())),
            Err(_) => {
                log::warn!("request abandoned after {:?}", self.timeout);
                Err(RemoteError::Timeout(self.timeout))
            }
        }
    }
}

impl RemoteSource for HttpRemote {
    async fn fetch_json(&self, url: Url) -> Result<Value, RemoteError> {
        log::debug!("GET {}", redact_key(&url));
        let result = self.execute(self.client.get(url.clone())).await;
        if let Err(e) = &result {
            log::error!("GET {} failed: {e}", redact_key(&url));
        }
        result
    }

    async fn send_json(&self, url: Url, payload: Value) -> Result<Value, RemoteError> {
        log::debug!("POST {}", redact_key(&url));
        let result = self
            .execute(self.client.post(url.clone()).json(&payload))
            .await;
        if let Err(e) = &result {
            log::error!("POST {} failed: {e}", redact_key(&url));
        }
        result
    }
}

/// Hide the API key when a URL ends up in the logs.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
