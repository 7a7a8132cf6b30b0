//! Request pipeline shared by every endpoint
//!
//! Builds the request, attaches the bearer token, and turns the response
//! into either parsed JSON or a classified [`HttpError`].

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorBody, HttpError, Result};
use crate::events::{AuthEvent, AuthEvents};
use crate::token_store::TokenProvider;
use crate::types::ConfigResponse;
use hyper::ext::ReasonPhrase;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const APPLICATION_JSON: &str = "application/json";

/// Typed client for the member REST API
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http_client: Client,
    tokens: Arc<dyn TokenProvider>,
    auth_events: AuthEvents,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Client configuration (validated here)
    /// * `tokens` - Where the bearer token is read from and cleared on 401
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
            tokens,
            auth_events: AuthEvents::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenProvider> {
        &self.tokens
    }

    /// Channel on which authentication failures are announced
    pub fn auth_events(&self) -> &AuthEvents {
        &self.auth_events
    }

    /// Send a request to an API endpoint (relative to the API prefix).
    ///
    /// A 401 clears the stored token and publishes
    /// [`AuthEvent::Unauthenticated`] before the error is returned.
    #[instrument(skip(self, body))]
    pub async fn request<T, B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(endpoint);
        let response = self.send(method, &url, body).await?;

        match Self::read_response(response).await {
            Err(ClientError::Http(err)) if err.is_unauthorized() => {
                warn!(endpoint = %endpoint, "Credentials rejected, clearing stored token");
                self.tokens.clear();
                self.auth_events.publish(AuthEvent::Unauthenticated {
                    endpoint: endpoint.to_string(),
                });
                Err(err.into())
            }
            other => other,
        }
    }

    /// `GET` an API endpoint
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request::<T, ()>(endpoint, Method::GET, None).await
    }

    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<ConfigResponse> {
        self.get("/config").await
    }

    /// Issue a single call; only transport failures surface here
    pub(crate) async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, APPLICATION_JSON);

        if let Some(token) = self.tokens.get() {
            request = request.header(AUTHORIZATION, token.bearer());
        }

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        debug!(method = %method, url = %url, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Request failed before a response arrived");
            ClientError::Transport(e)
        })?;

        debug!(status = %response.status(), url = %url, "Received response");
        Ok(response)
    }

    /// Parse a success body, or classify a failure
    pub(crate) async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::classify(response).await.into());
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Ok(serde_json::from_value(empty_object())?);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(empty_object())?);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn classify(response: Response) -> HttpError {
        let status = response.status();
        let status_text = reason_phrase(&response).unwrap_or_default();

        // a malformed or missing error body falls back to the status line
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes).ok(),
            Err(e) => {
                debug!(error = %e, "Could not read error body");
                None
            }
        };

        let err = HttpError::new(status.as_u16(), &status_text, body);
        warn!(status = %err.status(), message = %err.message(), "Server returned an error");
        err
    }
}

/// Reason phrase as sent on the wire, or the canonical one for the status.
///
/// hyper only records the wire phrase when it differs from the canonical
/// reason, so the fallback covers the common case.
fn reason_phrase(response: &Response) -> Option<String> {
    let wire = response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .map(str::to_string);

    wire.or_else(|| response.status().canonical_reason().map(str::to_string))
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
