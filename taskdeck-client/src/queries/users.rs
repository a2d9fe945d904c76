/// User administration queries and mutations
///
/// The user-management surface is gated here: a non-admin caller is refused
/// locally, before any request is sent, so the policy rule is enforced in
/// one testable place instead of being scattered across views.

use std::sync::Arc;

use taskdeck_shared::auth::authorization;
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse};
use taskdeck_shared::models::user::{CreateUser, UpdateUser, User, UserFilters};

use crate::cache::{EntityKind, Freshness, Invalidate, MutationTarget, QueryClient, QueryKey, QueryScope};
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notice, Notifier};
use crate::services::UserService;
use crate::store::session::SessionStore;

use super::{surface_mutation_error, validated};

/// Invalidations every user mutation applies to the list caches
fn user_list_invalidations() -> Vec<Invalidate> {
    vec![
        Invalidate::Scope(QueryScope::Users),
        Invalidate::Scope(QueryScope::AllUsers),
    ]
}

/// User administration façade
#[derive(Clone)]
pub struct UserQueries {
    service: UserService,
    cache: Arc<QueryClient>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl UserQueries {
    /// Wires the façade
    pub fn new(
        service: UserService,
        cache: Arc<QueryClient>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { service, cache, session, notifier }
    }

    /// Refuses non-admin callers without touching the network
    fn require_management_access(&self) -> ClientResult<()> {
        let viewer = self.session.current_user();
        if !authorization::can_view_user_management(viewer.as_ref()) {
            let error = ClientError::Forbidden("User management requires an admin role".to_string());
            self.notifier.notify(Notice::error(error.notice_message()));
            return Err(error);
        }
        Ok(())
    }

    /// Users matching the filters (admin surface)
    pub async fn users(&self, filters: &UserFilters) -> ClientResult<ListResponse<User>> {
        self.require_management_access()?;

        let key = QueryKey::list(QueryScope::Users, filters)?;
        let service = self.service.clone();
        let filters = filters.clone();

        self.cache
            .fetch(key, Freshness::List, move || async move {
                service.list(&filters).await
            })
            .await
    }

    /// Unfiltered user list for assignment pickers (long staleness window)
    pub async fn assignable_users(&self) -> ClientResult<Vec<User>> {
        let filters = UserFilters::default();
        let key = QueryKey::list(QueryScope::AllUsers, &filters)?;
        let service = self.service.clone();

        let envelope: ListResponse<User> = self
            .cache
            .fetch(key, Freshness::Lookup, move || async move {
                service.list(&filters).await
            })
            .await?;

        Ok(envelope.response)
    }

    /// One user by id
    pub async fn user(&self, id: &str) -> ClientResult<User> {
        let key = QueryKey::entity(QueryScope::User, id);
        let service = self.service.clone();
        let id = id.to_string();

        let envelope: EntityResponse<User> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.get(&id).await
            })
            .await?;

        Ok(envelope.response)
    }

    /// Creates a user
    pub async fn create_user(&self, data: &CreateUser) -> ClientResult<User> {
        self.require_management_access()?;
        validated(data, &self.notifier)?;

        let service = self.service.clone();
        let data = data.clone();

        let envelope: EntityResponse<User> = self
            .cache
            .mutate(
                MutationTarget::Collection(EntityKind::User),
                user_list_invalidations(),
                || async move { service.create(&data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("User created successfully!"));
        Ok(envelope.response)
    }

    /// Updates a user and writes the confirmed record through to its by-id entry
    pub async fn update_user(&self, id: &str, data: &UpdateUser) -> ClientResult<User> {
        let service = self.service.clone();
        let data = data.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<User> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::User, id.to_string()),
                user_list_invalidations(),
                || async move { service.update(&target_id, &data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::User, id), &envelope)?;

        // Editing your own account keeps the session copy in sync.
        if self.session.current_user().map(|u| u.id) == Some(envelope.response.id.clone()) {
            self.session.update_user(envelope.response.clone());
        }

        self.notifier.notify(Notice::success("User updated successfully!"));
        Ok(envelope.response)
    }

    /// Deletes a user
    pub async fn delete_user(&self, id: &str) -> ClientResult<()> {
        let service = self.service.clone();
        let target_id = id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::User, id.to_string()),
                user_list_invalidations(),
                || async move { service.delete(&target_id).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.remove(&QueryKey::entity(QueryScope::User, id));
        self.notifier.notify(Notice::success("User deleted successfully!"));
        Ok(())
    }

    /// Toggles a user's activity flag
    pub async fn toggle_user_status(&self, id: &str, is_active: bool) -> ClientResult<User> {
        let service = self.service.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<User> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::User, id.to_string()),
                user_list_invalidations(),
                || async move { service.toggle_status(&target_id, is_active).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::User, id), &envelope)?;
        self.notifier.notify(Notice::success(if is_active {
            "User activated!"
        } else {
            "User deactivated!"
        }));
        Ok(envelope.response)
    }
}
