/// Board queries and mutations
///
/// Reads resolve through the cache and re-apply the visibility policy with
/// the caller's current session, so a cached list reused under a different
/// role context is narrowed again. Mutations declare their invalidations;
/// updates additionally write the server-confirmed record through to the
/// by-id entry.

use std::sync::Arc;

use taskdeck_shared::auth::authorization;
use taskdeck_shared::models::board::{Board, BoardFilters, CreateBoard, UpdateBoard};
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse};
use taskdeck_shared::models::member::{BoardMember, BoardMemberRole};

use crate::cache::{EntityKind, Freshness, Invalidate, MutationTarget, QueryClient, QueryKey, QueryScope};
use crate::error::ClientResult;
use crate::notify::{Notice, Notifier};
use crate::services::BoardService;
use crate::store::session::SessionStore;

use super::{surface_mutation_error, validated};

/// Invalidations every board mutation applies to the list caches
fn board_list_invalidations() -> Vec<Invalidate> {
    vec![
        Invalidate::Scope(QueryScope::Boards),
        Invalidate::Scope(QueryScope::MyBoards),
        Invalidate::Scope(QueryScope::AllBoards),
    ]
}

/// Invalidations for membership changes on one board
fn member_invalidations(board_id: &str) -> Vec<Invalidate> {
    vec![
        Invalidate::Key(QueryKey::entity(QueryScope::BoardMembers, board_id)),
        Invalidate::Key(QueryKey::entity(QueryScope::Board, board_id)),
    ]
}

/// Board façade
#[derive(Clone)]
pub struct BoardQueries {
    service: BoardService,
    cache: Arc<QueryClient>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl BoardQueries {
    /// Wires the façade
    pub fn new(
        service: BoardService,
        cache: Arc<QueryClient>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { service, cache, session, notifier }
    }

    /// Boards matching the filters, narrowed to what the viewer may see
    pub async fn boards(&self, filters: &BoardFilters) -> ClientResult<ListResponse<Board>> {
        let key = QueryKey::list(QueryScope::Boards, filters)?;
        let service = self.service.clone();
        let filters = filters.clone();

        let mut envelope: ListResponse<Board> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.list(&filters).await
            })
            .await?;

        let viewer = self.session.current_user();
        envelope.response = authorization::filter_visible_boards(viewer.as_ref(), envelope.response);
        Ok(envelope)
    }

    /// The current user's boards
    pub async fn my_boards(&self, filters: &BoardFilters) -> ClientResult<ListResponse<Board>> {
        let key = QueryKey::list(QueryScope::MyBoards, filters)?;
        let service = self.service.clone();
        let filters = filters.clone();

        let mut envelope: ListResponse<Board> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.my_boards(&filters).await
            })
            .await?;

        let viewer = self.session.current_user();
        envelope.response = authorization::filter_visible_boards(viewer.as_ref(), envelope.response);
        Ok(envelope)
    }

    /// Unfiltered board list for selection widgets (long staleness window)
    pub async fn board_options(&self) -> ClientResult<Vec<Board>> {
        let filters = BoardFilters::default();
        let key = QueryKey::list(QueryScope::AllBoards, &filters)?;
        let service = self.service.clone();

        let envelope: ListResponse<Board> = self
            .cache
            .fetch(key, Freshness::Lookup, move || async move {
                service.list(&filters).await
            })
            .await?;

        let viewer = self.session.current_user();
        Ok(authorization::filter_visible_boards(viewer.as_ref(), envelope.response))
    }

    /// One board by id
    pub async fn board(&self, id: &str) -> ClientResult<Board> {
        let key = QueryKey::entity(QueryScope::Board, id);
        let service = self.service.clone();
        let id = id.to_string();

        let envelope: EntityResponse<Board> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.get(&id).await
            })
            .await?;

        Ok(envelope.response)
    }

    /// Member list of one board
    pub async fn board_members(&self, board_id: &str) -> ClientResult<Vec<BoardMember>> {
        let key = QueryKey::entity(QueryScope::BoardMembers, board_id);
        let service = self.service.clone();
        let board_id = board_id.to_string();

        let envelope: ListResponse<BoardMember> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.members(&board_id).await
            })
            .await?;

        Ok(envelope.response)
    }

    /// Creates a board
    pub async fn create_board(&self, data: &CreateBoard) -> ClientResult<Board> {
        validated(data, &self.notifier)?;

        let service = self.service.clone();
        let data = data.clone();

        let envelope: EntityResponse<Board> = self
            .cache
            .mutate(
                MutationTarget::Collection(EntityKind::Board),
                board_list_invalidations(),
                || async move { service.create(&data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("Board created successfully!"));
        Ok(envelope.response)
    }

    /// Updates a board and writes the confirmed record through to its by-id entry
    pub async fn update_board(&self, id: &str, data: &UpdateBoard) -> ClientResult<Board> {
        let service = self.service.clone();
        let data = data.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<Board> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::Board, id.to_string()),
                board_list_invalidations(),
                || async move { service.update(&target_id, &data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::Board, id), &envelope)?;
        self.notifier.notify(Notice::success("Board updated successfully!"));
        Ok(envelope.response)
    }

    /// Deletes a board
    pub async fn delete_board(&self, id: &str) -> ClientResult<()> {
        let service = self.service.clone();
        let target_id = id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::Board, id.to_string()),
                board_list_invalidations(),
                || async move { service.delete(&target_id).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.remove(&QueryKey::entity(QueryScope::Board, id));
        self.notifier.notify(Notice::success("Board deleted successfully!"));
        Ok(())
    }

    /// Archives or unarchives a board
    pub async fn toggle_archive(&self, id: &str, is_archived: bool) -> ClientResult<Board> {
        let service = self.service.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<Board> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::Board, id.to_string()),
                board_list_invalidations(),
                || async move { service.toggle_archive(&target_id, is_archived).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::Board, id), &envelope)?;
        self.notifier.notify(Notice::success(if is_archived {
            "Board archived!"
        } else {
            "Board unarchived!"
        }));
        Ok(envelope.response)
    }

    /// Adds a member to a board
    pub async fn add_member(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardMemberRole,
    ) -> ClientResult<()> {
        let service = self.service.clone();
        let board = board_id.to_string();
        let user = user_id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::BoardMember, membership_id(board_id, user_id)),
                member_invalidations(board_id),
                || async move { service.add_member(&board, &user, role).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("Member added to board!"));
        Ok(())
    }

    /// Removes a member from a board
    pub async fn remove_member(&self, board_id: &str, user_id: &str) -> ClientResult<()> {
        let service = self.service.clone();
        let board = board_id.to_string();
        let user = user_id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::BoardMember, membership_id(board_id, user_id)),
                member_invalidations(board_id),
                || async move { service.remove_member(&board, &user).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("Member removed from board!"));
        Ok(())
    }

    /// Changes a member's role on a board
    pub async fn update_member_role(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardMemberRole,
    ) -> ClientResult<()> {
        let service = self.service.clone();
        let board = board_id.to_string();
        let user = user_id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::BoardMember, membership_id(board_id, user_id)),
                member_invalidations(board_id),
                || async move { service.update_member_role(&board, &user, role).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("Member role updated!"));
        Ok(())
    }
}

/// Mutation-claim id for a membership: one claim per (board, user) pair
fn membership_id(board_id: &str, user_id: &str) -> String {
    format!("{}:{}", board_id, user_id)
}
