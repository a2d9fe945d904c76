/// Authentication operations
///
/// Login, signup, logout, token refresh, and password recovery. These
/// functions only talk to the API; session state transitions happen in the
/// query layer, which owns the session store.

use std::sync::Arc;

use serde_json::json;
use taskdeck_shared::models::auth::{AuthResponse, LoginCredentials, RegisterCredentials};
use taskdeck_shared::models::envelope::MessageResponse;

use crate::error::ClientResult;
use crate::transport::{Method, Transport};

use super::{body, decode};

/// Typed access to the auth endpoints
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
}

impl AuthService {
    /// Creates the service over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<AuthResponse> {
        let value = self
            .transport
            .request(Method::POST, "/auth/login", &[], Some(body(credentials)?))
            .await?;
        decode(value)
    }

    /// `POST /auth/signup`
    pub async fn register(&self, credentials: &RegisterCredentials) -> ClientResult<AuthResponse> {
        let value = self
            .transport
            .request(Method::POST, "/auth/signup", &[], Some(body(credentials)?))
            .await?;
        decode(value)
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(Method::POST, "/auth/logout", &[], None)
            .await?;
        decode(value)
    }

    /// `POST /auth/refresh`
    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<AuthResponse> {
        let value = self
            .transport
            .request(
                Method::POST,
                "/auth/refresh",
                &[],
                Some(json!({ "refreshToken": refresh_token })),
            )
            .await?;
        decode(value)
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(
                Method::POST,
                "/auth/forgot-password",
                &[],
                Some(json!({ "email": email })),
            )
            .await?;
        decode(value)
    }

    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(
                Method::POST,
                "/auth/reset-password",
                &[],
                Some(json!({ "token": token, "password": password })),
            )
            .await?;
        decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeTransport;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(Ok(serde_json::json!({
            "message": "Welcome back",
            "response": {
                "user": {
                    "id": "u1",
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": "ada@example.com",
                    "role": "admin",
                    "status": "active",
                    "isActive": true,
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-01-01T00:00:00Z"
                },
                "accessToken": "at-1",
                "refreshToken": "rt-1"
            }
        })));

        let service = AuthService::new(transport.clone());
        let credentials = LoginCredentials {
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        };
        let auth = service.login(&credentials).await.unwrap();

        assert_eq!(auth.response.access_token, "at-1");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/auth/login");
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": "password123"
            }))
        );
    }

    #[tokio::test]
    async fn test_refresh_body_shape() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(Err(crate::error::ClientError::Unauthorized("expired".to_string())));

        let service = AuthService::new(transport.clone());
        assert!(service.refresh("rt-1").await.is_err());

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/auth/refresh");
        assert_eq!(requests[0].body, Some(serde_json::json!({ "refreshToken": "rt-1" })));
    }
}
