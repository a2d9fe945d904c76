/// Session lifecycle
///
/// Login and registration transition the session store atomically on the
/// server's confirmation; nothing is stored before the response arrives.
/// Logout always clears the local session and the query cache, even when
/// the server call fails: the user asked to leave, and a dead session must
/// not keep serving cached private data.

use std::sync::Arc;

use taskdeck_shared::auth::authorization;
use taskdeck_shared::models::auth::{LoginCredentials, RegisterCredentials};
use taskdeck_shared::models::user::User;

use crate::cache::QueryClient;
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notice, Notifier};
use crate::services::AuthService;
use crate::store::session::SessionStore;

use super::validated;

/// Authentication façade
#[derive(Clone)]
pub struct AuthQueries {
    service: AuthService,
    cache: Arc<QueryClient>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthQueries {
    /// Wires the façade
    pub fn new(
        service: AuthService,
        cache: Arc<QueryClient>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { service, cache, session, notifier }
    }

    /// Logs in and establishes the session
    ///
    /// On failure the session stays unauthenticated and no token is stored;
    /// the transport has already surfaced the one error notice.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<User> {
        validated(credentials, &self.notifier)?;

        self.session.set_loading(true);

        match self.service.login(credentials).await {
            Ok(auth) => {
                let payload = auth.response;
                self.session.set_auth(
                    payload.user.clone(),
                    payload.access_token,
                    payload.refresh_token,
                );
                self.notifier.notify(Notice::success("Welcome back!"));
                Ok(payload.user)
            }
            Err(err) => {
                self.session.set_loading(false);
                Err(err)
            }
        }
    }

    /// Registers a new account and establishes the session
    pub async fn register(&self, credentials: &RegisterCredentials) -> ClientResult<User> {
        validated(credentials, &self.notifier)?;

        self.session.set_loading(true);

        match self.service.register(credentials).await {
            Ok(auth) => {
                let payload = auth.response;
                self.session.set_auth(
                    payload.user.clone(),
                    payload.access_token,
                    payload.refresh_token,
                );
                self.notifier.notify(Notice::success("Account created successfully!"));
                Ok(payload.user)
            }
            Err(err) => {
                self.session.set_loading(false);
                Err(err)
            }
        }
    }

    /// Logs out
    ///
    /// The server call is best-effort; local state is cleared either way.
    pub async fn logout(&self) {
        let result = self.service.logout().await;

        self.session.clear_auth();
        self.cache.clear();

        match result {
            Ok(_) => self.notifier.notify(Notice::success("Logged out successfully")),
            Err(err) => {
                // The transport already surfaced the failure; the local
                // logout still completed.
                tracing::debug!(error = %err, "server logout failed, local session cleared");
            }
        }
    }

    /// Rotates tokens using the stored refresh token
    ///
    /// A missing refresh token is a programmatic error for the caller, not
    /// a user-facing failure, so it produces no notice.
    pub async fn refresh(&self) -> ClientResult<User> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| ClientError::Unauthorized("No refresh token stored".to_string()))?;

        let auth = self.service.refresh(&refresh_token).await?;
        let payload = auth.response;
        self.session.set_auth(
            payload.user.clone(),
            payload.access_token,
            payload.refresh_token,
        );
        Ok(payload.user)
    }

    /// Requests a password-recovery email
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let response = self.service.forgot_password(email).await?;
        self.notifier.notify(Notice::success(response.message));
        Ok(())
    }

    /// Completes a password reset
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        let response = self.service.reset_password(token, password).await?;
        self.notifier.notify(Notice::success(response.message));
        Ok(())
    }

    /// Landing route for the current session's role
    pub fn post_login_destination(&self) -> &'static str {
        let viewer = self.session.current_user();
        authorization::post_login_destination(authorization::effective_role(viewer.as_ref()))
    }
}
