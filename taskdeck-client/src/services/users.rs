/// User administration operations
///
/// One function per `/users` endpoint. Whether the caller may use these at
/// all is the authorization policy's concern; the service itself is a thin
/// typed wrapper.

use std::sync::Arc;

use serde_json::json;
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse, MessageResponse};
use taskdeck_shared::models::user::{CreateUser, UpdateUser, User, UserFilters};

use crate::error::ClientResult;
use crate::transport::{Method, Transport};

use super::{body, decode};

/// Typed access to the user endpoints
#[derive(Clone)]
pub struct UserService {
    transport: Arc<dyn Transport>,
}

impl UserService {
    /// Creates the service over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /users`: all users matching the filters
    pub async fn list(&self, filters: &UserFilters) -> ClientResult<ListResponse<User>> {
        let value = self
            .transport
            .request(Method::GET, "/users", &filters.to_query(), None)
            .await?;
        decode(value)
    }

    /// `GET /users/:id`
    pub async fn get(&self, id: &str) -> ClientResult<EntityResponse<User>> {
        let value = self
            .transport
            .request(Method::GET, &format!("/users/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `POST /users`
    pub async fn create(&self, data: &CreateUser) -> ClientResult<EntityResponse<User>> {
        let value = self
            .transport
            .request(Method::POST, "/users", &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `PATCH /users/:id`
    pub async fn update(&self, id: &str, data: &UpdateUser) -> ClientResult<EntityResponse<User>> {
        let value = self
            .transport
            .request(Method::PATCH, &format!("/users/{}", id), &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `DELETE /users/:id`
    pub async fn delete(&self, id: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(Method::DELETE, &format!("/users/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `PATCH /users/:id/toggle-status`
    pub async fn toggle_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> ClientResult<EntityResponse<User>> {
        let value = self
            .transport
            .request(
                Method::PATCH,
                &format!("/users/{}/toggle-status", id),
                &[],
                Some(json!({ "isActive": is_active })),
            )
            .await?;
        decode(value)
    }
}
