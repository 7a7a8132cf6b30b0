//! Login and logout on top of the request pipeline

use crate::client::ApiClient;
use crate::error::Result;
use crate::token_store::TokenProvider;
use crate::types::{DevLoginRequest, DevLoginResponse};
use chrono::Utc;
use reqwest::Method;
use std::future::Future;
use tracing::{info, instrument};

/// Session lifecycle operations
pub trait AuthClient: Send + Sync + 'static {
    /// Obtain a token and persist it (token, expiry and roles)
    fn login(
        &self,
        request: Option<&DevLoginRequest>,
    ) -> impl Future<Output = Result<DevLoginResponse>> + Send;

    /// Forget the stored session
    fn logout(&self);

    /// A stored token exists and has not expired
    fn is_authenticated(&self) -> bool;
}

impl ApiClient {
    /// `POST /dev-login`, served outside the API prefix.
    ///
    /// The body is `request` or `{}`. Errors are classified the same way as
    /// API calls, but a 401 here does not clear anything or trigger a
    /// redirect. Nothing is persisted; see [`AuthClient::login`].
    #[instrument(skip(self, request))]
    pub async fn dev_login(&self, request: Option<&DevLoginRequest>) -> Result<DevLoginResponse> {
        let empty = DevLoginRequest::default();
        let body = request.unwrap_or(&empty);

        let url = self.config().login_url();
        let response = self.send(Method::POST, &url, Some(body)).await?;
        Self::read_response(response).await
    }
}

impl AuthClient for ApiClient {
    async fn login(&self, request: Option<&DevLoginRequest>) -> Result<DevLoginResponse> {
        let response = self.dev_login(request).await?;

        self.tokens().set(&response.to_access_token());
        self.tokens().set_roles(&response.roles);

        info!(
            subject = %response.subject,
            roles = ?response.roles,
            expires_at = %response.expires_at,
            "Logged in"
        );
        Ok(response)
    }

    fn logout(&self) {
        self.tokens().clear();
        info!("Logged out");
    }

    fn is_authenticated(&self) -> bool {
        self.tokens().is_authenticated(Utc::now())
    }
}
