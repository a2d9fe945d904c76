/// HTTP transport to the Taskdeck API
///
/// A single configured HTTP client behind a trait seam. The trait exists so
/// domain services and the cache layer can be exercised against an in-memory
/// transport in tests; production uses [`HttpTransport`] over `reqwest`.
///
/// # Failure contract
///
/// Every failure path emits exactly one user-visible notice from this layer;
/// success paths emit none (success notices belong to the caller). The
/// translation ladder:
///
/// - **401**: clears the session, notices "session expired", and signals a
///   redirect to the login entry point. Never retried.
/// - **403**: notices "access denied"; the session is kept.
/// - **5xx**: notices a generic server error.
/// - **other non-2xx**: notices the server-provided message when present,
///   otherwise a generic fallback; 4xx bodies with field details surface as
///   validation errors.
/// - **network failure / timeout**: notices a generic connection error.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::notify::{Notice, Notifier};
use crate::store::session::SessionStore;

pub use reqwest::Method;

/// Performs HTTP requests against the API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the raw JSON body of a 2xx response
    ///
    /// `query` pairs are appended as-is; callers are responsible for only
    /// passing pairs for fields that are actually present.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ClientResult<Value>;
}

/// Production transport over `reqwest`
pub struct HttpTransport {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl HttpTransport {
    /// Creates a transport with the configured base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, config, session, notifier })
    }

    /// Translates a non-2xx response and performs its side effects
    async fn fail(&self, status: u16, response: reqwest::Response) -> ClientError {
        let body = response.json::<ErrorBody>().await.ok();
        let error = ClientError::from_status(status, body);

        if let ClientError::Unauthorized(_) = &error {
            // A dead session is fatal: drop it and send the UI to login.
            self.session.clear_auth();
            self.notifier.notify(Notice::error(error.notice_message()));
            self.notifier.redirect_to_login();
        } else {
            self.notifier.notify(Notice::error(error.notice_message()));
        }

        error
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let url = self.config.url(path);
        tracing::debug!(%method, %url, "api request");

        let mut request = self.http.request(method.clone(), url.as_str());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }

        // Hard upper bound on the whole call, over and above reqwest's own
        // connect timeout.
        let sent = tokio::time::timeout(self.config.timeout(), request.send()).await;

        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                let error = if err.is_timeout() {
                    ClientError::Timeout(self.config.timeout_secs)
                } else {
                    ClientError::Network(err.to_string())
                };
                tracing::error!(%method, %url, error = %error, "api request failed");
                self.notifier.notify(Notice::error(error.notice_message()));
                return Err(error);
            }
            Err(_) => {
                let error = ClientError::Timeout(self.config.timeout_secs);
                tracing::error!(%method, %url, error = %error, "api request timed out");
                self.notifier.notify(Notice::error(error.notice_message()));
                return Err(error);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error = self.fail(status.as_u16(), response).await;
            tracing::error!(%method, %url, %status, error = %error, "api request failed");
            return Err(error);
        }

        match response.json::<Value>().await {
            Ok(value) => Ok(value),
            Err(err) => {
                let error = ClientError::Decode(err.to_string());
                tracing::error!(%method, %url, error = %error, "malformed api response");
                self.notifier.notify(Notice::error(error.notice_message()));
                Err(error)
            }
        }
    }
}
