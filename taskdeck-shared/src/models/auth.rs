/// Authentication payloads
///
/// Request and response shapes for the `/auth/*` endpoints. The auth
/// response nests user and tokens inside the usual `response` envelope and
/// additionally carries an optional `status` string.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::User;

/// Credentials for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginCredentials {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Credentials for `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredentials {
    /// First name
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    /// Last name
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Payload for the change-password form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    /// Current password
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,

    /// Confirmation of the new password
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// User and token bundle inside an auth response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// The authenticated user
    pub user: User,

    /// Bearer token for subsequent requests
    pub access_token: String,

    /// Token used to obtain a fresh access token
    pub refresh_token: String,
}

/// Response of login/signup/refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Server status string, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Human-readable status message
    pub message: String,

    /// User and tokens
    pub response: AuthPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_requires_valid_email() {
        let credentials = LoginCredentials {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        let errors = credentials.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_requires_password_length() {
        let credentials = RegisterCredentials {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
        };
        let errors = credentials.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_change_password_confirmation_must_match() {
        let payload = ChangePassword {
            current_password: "old-password".to_string(),
            new_password: "new-password-1".to_string(),
            confirm_password: "new-password-2".to_string(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_auth_response_wire_shape() {
        let body = serde_json::json!({
            "status": "success",
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
        });

        let parsed: AuthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.response.access_token, "at-1");
        assert_eq!(parsed.response.user.id, "u1");
    }
}
