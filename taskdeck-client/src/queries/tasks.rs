/// Task queries and mutations
///
/// Every list read re-applies the visibility policy: a plain user only ever
/// sees tasks assigned to them, regardless of what the cached server
/// response contains. Task creation validates locally (a missing board is
/// rejected before any request is sent).

use std::sync::Arc;

use taskdeck_shared::auth::authorization;
use taskdeck_shared::models::envelope::{EntityResponse, ListResponse};
use taskdeck_shared::models::task::{
    CreateTask, MyTasksFilters, Task, TaskFilters, TaskStatus, UpdateTask,
};

use crate::cache::{EntityKind, Freshness, Invalidate, MutationTarget, QueryClient, QueryKey, QueryScope};
use crate::error::ClientResult;
use crate::notify::{Notice, Notifier};
use crate::services::TaskService;
use crate::store::session::SessionStore;

use super::{surface_mutation_error, validated};

/// Invalidations every task mutation applies to the list caches
fn task_list_invalidations() -> Vec<Invalidate> {
    vec![
        Invalidate::Scope(QueryScope::Tasks),
        Invalidate::Scope(QueryScope::MyTasks),
    ]
}

/// Task façade
#[derive(Clone)]
pub struct TaskQueries {
    service: TaskService,
    cache: Arc<QueryClient>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl TaskQueries {
    /// Wires the façade
    pub fn new(
        service: TaskService,
        cache: Arc<QueryClient>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { service, cache, session, notifier }
    }

    /// Tasks matching the filters, narrowed to what the viewer may see
    pub async fn tasks(&self, filters: &TaskFilters) -> ClientResult<ListResponse<Task>> {
        let key = QueryKey::list(QueryScope::Tasks, filters)?;
        let service = self.service.clone();
        let filters = filters.clone();

        let mut envelope: ListResponse<Task> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.list(&filters).await
            })
            .await?;

        let viewer = self.session.current_user();
        envelope.response = authorization::filter_visible_tasks(viewer.as_ref(), envelope.response);
        Ok(envelope)
    }

    /// Tasks assigned to the current user
    pub async fn my_tasks(&self, filters: &MyTasksFilters) -> ClientResult<ListResponse<Task>> {
        let key = QueryKey::list(QueryScope::MyTasks, filters)?;
        let service = self.service.clone();
        let filters = filters.clone();

        let mut envelope: ListResponse<Task> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.my_tasks(&filters).await
            })
            .await?;

        let viewer = self.session.current_user();
        envelope.response = authorization::filter_visible_tasks(viewer.as_ref(), envelope.response);
        Ok(envelope)
    }

    /// One task by id
    pub async fn task(&self, id: &str) -> ClientResult<Task> {
        let key = QueryKey::entity(QueryScope::Task, id);
        let service = self.service.clone();
        let id = id.to_string();

        let envelope: EntityResponse<Task> = self
            .cache
            .fetch(key, Freshness::List, move || async move {
                service.get(&id).await
            })
            .await?;

        Ok(envelope.response)
    }

    /// Creates a task; an invalid payload never reaches the network
    pub async fn create_task(&self, data: &CreateTask) -> ClientResult<Task> {
        validated(data, &self.notifier)?;

        let service = self.service.clone();
        let data = data.clone();

        let envelope: EntityResponse<Task> = self
            .cache
            .mutate(
                MutationTarget::Collection(EntityKind::Task),
                task_list_invalidations(),
                || async move { service.create(&data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.notifier.notify(Notice::success("Task created successfully!"));
        Ok(envelope.response)
    }

    /// Updates a task and writes the confirmed record through to its by-id entry
    pub async fn update_task(&self, id: &str, data: &UpdateTask) -> ClientResult<Task> {
        let service = self.service.clone();
        let data = data.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<Task> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, id.to_string()),
                task_list_invalidations(),
                || async move { service.update(&target_id, &data).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::Task, id), &envelope)?;
        self.notifier.notify(Notice::success("Task updated successfully!"));
        Ok(envelope.response)
    }

    /// Deletes a task
    pub async fn delete_task(&self, id: &str) -> ClientResult<()> {
        let service = self.service.clone();
        let target_id = id.to_string();

        self.cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, id.to_string()),
                task_list_invalidations(),
                || async move { service.delete(&target_id).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.remove(&QueryKey::entity(QueryScope::Task, id));
        self.notifier.notify(Notice::success("Task deleted successfully!"));
        Ok(())
    }

    /// Assigns a task to a user
    pub async fn assign_task(&self, id: &str, user_id: &str) -> ClientResult<Task> {
        let service = self.service.clone();
        let target_id = id.to_string();
        let user_id = user_id.to_string();

        let envelope: EntityResponse<Task> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, id.to_string()),
                task_list_invalidations(),
                || async move { service.assign(&target_id, &user_id).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::Task, id), &envelope)?;
        self.notifier.notify(Notice::success("Task assigned!"));
        Ok(envelope.response)
    }

    /// Changes a task's status
    ///
    /// Any status may follow any other; the server is the only judge of the
    /// payload, there is no client-side transition table.
    pub async fn update_status(&self, id: &str, status: TaskStatus) -> ClientResult<Task> {
        let service = self.service.clone();
        let target_id = id.to_string();

        let envelope: EntityResponse<Task> = self
            .cache
            .mutate(
                MutationTarget::Entity(EntityKind::Task, id.to_string()),
                task_list_invalidations(),
                || async move { service.update_status(&target_id, status).await },
            )
            .await
            .map_err(|err| surface_mutation_error(&self.notifier, err))?;

        self.cache.store(QueryKey::entity(QueryScope::Task, id), &envelope)?;
        self.notifier.notify(Notice::success("Task status updated!"));
        Ok(envelope.response)
    }
}
