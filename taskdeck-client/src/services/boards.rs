/// Board operations
///
/// One function per `/boards` endpoint. All errors propagate unmodified
/// from the transport.

use std::sync::Arc;

use serde_json::json;
use taskdeck_shared::models::board::{Board, BoardFilters, CreateBoard, UpdateBoard};
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse, MessageResponse};
use taskdeck_shared::models::member::{BoardMember, BoardMemberRole};

use crate::error::ClientResult;
use crate::transport::{Method, Transport};

use super::{body, decode};

/// Typed access to the board endpoints
#[derive(Clone)]
pub struct BoardService {
    transport: Arc<dyn Transport>,
}

impl BoardService {
    /// Creates the service over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /boards`: all boards matching the filters
    pub async fn list(&self, filters: &BoardFilters) -> ClientResult<ListResponse<Board>> {
        let value = self
            .transport
            .request(Method::GET, "/boards", &filters.to_query(), None)
            .await?;
        decode(value)
    }

    /// `GET /boards/my-boards`: boards belonging to the current user
    pub async fn my_boards(&self, filters: &BoardFilters) -> ClientResult<ListResponse<Board>> {
        let value = self
            .transport
            .request(Method::GET, "/boards/my-boards", &filters.to_query(), None)
            .await?;
        decode(value)
    }

    /// `GET /boards/:id`
    pub async fn get(&self, id: &str) -> ClientResult<EntityResponse<Board>> {
        let value = self
            .transport
            .request(Method::GET, &format!("/boards/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `POST /boards`
    pub async fn create(&self, data: &CreateBoard) -> ClientResult<EntityResponse<Board>> {
        let value = self
            .transport
            .request(Method::POST, "/boards", &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `PATCH /boards/:id`
    pub async fn update(&self, id: &str, data: &UpdateBoard) -> ClientResult<EntityResponse<Board>> {
        let value = self
            .transport
            .request(Method::PATCH, &format!("/boards/{}", id), &[], Some(body(data)?))
            .await?;
        decode(value)
    }

    /// `DELETE /boards/:id`
    pub async fn delete(&self, id: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(Method::DELETE, &format!("/boards/{}", id), &[], None)
            .await?;
        decode(value)
    }

    /// `PATCH /boards/:id/archive`
    pub async fn toggle_archive(
        &self,
        id: &str,
        is_archived: bool,
    ) -> ClientResult<EntityResponse<Board>> {
        let value = self
            .transport
            .request(
                Method::PATCH,
                &format!("/boards/{}/archive", id),
                &[],
                Some(json!({ "isArchived": is_archived })),
            )
            .await?;
        decode(value)
    }

    /// `GET /boards/:id/members`
    pub async fn members(&self, board_id: &str) -> ClientResult<ListResponse<BoardMember>> {
        let value = self
            .transport
            .request(Method::GET, &format!("/boards/{}/members", board_id), &[], None)
            .await?;
        decode(value)
    }

    /// `POST /boards/:id/members`
    pub async fn add_member(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardMemberRole,
    ) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(
                Method::POST,
                &format!("/boards/{}/members", board_id),
                &[],
                Some(json!({ "userId": user_id, "role": role })),
            )
            .await?;
        decode(value)
    }

    /// `DELETE /boards/:id/members/:userId`
    pub async fn remove_member(&self, board_id: &str, user_id: &str) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(
                Method::DELETE,
                &format!("/boards/{}/members/{}", board_id, user_id),
                &[],
                None,
            )
            .await?;
        decode(value)
    }

    /// `PATCH /boards/:id/members/:userId`
    pub async fn update_member_role(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardMemberRole,
    ) -> ClientResult<MessageResponse> {
        let value = self
            .transport
            .request(
                Method::PATCH,
                &format!("/boards/{}/members/{}", board_id, user_id),
                &[],
                Some(json!({ "role": role })),
            )
            .await?;
        decode(value)
    }
}
