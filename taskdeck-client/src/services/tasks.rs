/// Task operations
///
/// One function per `/tasks` endpoint. All errors propagate unmodified from
/// the transport.

use std::sync::Arc;

use serde_json::json;
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse, MessageResponse};
use taskdeck_shared::models::task::{
    CreateTask, MyTasksFilters, Task, TaskFilters, TaskStatus, UpdateTask,
};

use crate::error::ClientResult;
use crate::transport::{Method, Transport};

use super::{body, decode};

/// Typed access to the task endpoints
#[derive(Clone)]
pub struct TaskService {
    transport: Arc<dyn Transport>,
}

impl TaskService {
    /// Creates the service over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /tasks`: all tasks matching the filters
    pub async fn list(&self, filters: &TaskFilters) -> ClientResult<ListResponse<Task>> {
        let value = self
            .transport
            .request(Method::GET, "/tasks", &filters.to_query(), None)
            .await?;
        decode(value)
    }

    /// `GET /tasks/my-tasks`: tasks assigned to the current user
    pub async fn my_tasks(&self, filters: &MyTasksFilters) -> ClientResult<ListResponse<Task>> {
        let value = self
            .transport
            .request(Method::GET, "/tasks/my-tasks", &filters.to_query(), None)
            .await?;
        decode(value)
    }

    /// `GET /tasks/:id`
    pub async fn get(&self, id: &str) -> ClientResult<EntityResponse<Task>> {
        let value = self
            .transport
            .request(Method::GET, &format!("/tasks/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `POST /tasks`
    pub async fn create(&self, data: &CreateTask) -> ClientResult<EntityResponse<Task>> {
        let value = self
            .transport
            .request(Method::POST, "/tasks", &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `PATCH /tasks/:id`
    pub async fn update(&self, id: &str, data: &UpdateTask) -> ClientResult<EntityResponse<Task>> {
        let value = self
            .transport
            .request(Method::PATCH, &format!("/tasks/{}", id), &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `DELETE /tasks/:id`
    pub async fn delete(&self, id: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(Method::DELETE, &format!("/tasks/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `PATCH /tasks/:id/assign/:userId`
    pub async fn assign(&self, id: &str, user_id: &str) -> ClientResult<EntityResponse<Task>> {
        let value = self
            .transport
            .request(
                Method::PATCH,
                &format!("/tasks/{}/assign/{}", id, user_id),
                &[],
                None,
            )
            .await?;
        decode(value)
    }

    /// `PATCH /tasks/:id/status`
    pub async fn update_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> ClientResult<EntityResponse<Task>> {
        let value = self
            .transport
            .request(
                Method::PATCH,
                &format!("/tasks/{}/status", id),
                &[],
                Some(json!({ "status": status })),
            )
            .await?;
        decode(value)
    }
}
