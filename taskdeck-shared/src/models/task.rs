/// Task model and related payloads
///
/// Tasks always belong to exactly one board. Status transitions are
/// deliberately unconstrained: any status may follow any other, so there is
/// no transition validation here. Subtasks nest one level; the client never
/// recurses further than `subTasks`.
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::task::CreateTask;
///
/// let mut payload = CreateTask::new("Ship the release", "board-1");
/// assert!(payload.add_tag("urgent"));
/// assert!(!payload.add_tag("urgent")); // duplicates are rejected
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserSummary;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Awaiting review
    InReview,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::InReview => "in_review",
            TaskStatus::Done => "done",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority
    Medium,

    /// High priority
    High,

    /// Urgent priority
    Urgent,
}

impl TaskPriority {
    /// Converts priority to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Compact board reference embedded in a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Board ID
    pub id: String,

    /// Board name
    pub name: String,
}

/// Compact parent-task reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentTaskSummary {
    /// Task ID
    pub id: String,

    /// Task title
    pub title: String,
}

/// Task as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: String,

    /// Title
    pub title: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// Completion timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Estimated effort in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Ordering position within its column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// Ordered tags; the client-side add path rejects duplicates
    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-form metadata attached by the server
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Board the task belongs to
    pub board_id: String,

    /// Assigned user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,

    /// ID of the creating user
    pub created_by_id: String,

    /// Parent task, if this is a subtask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker, if the server exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Board summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardSummary>,

    /// Assignee summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<UserSummary>,

    /// Creator summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummary>,

    /// Parent task summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<ParentTaskSummary>,

    /// Direct subtasks (one level)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<Task>>,
}

impl Task {
    /// Checks whether the task is assigned to the given user
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_user_id.as_deref() == Some(user_id)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    /// Title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial status (server defaults to `todo` when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Initial priority (server defaults to `medium` when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    /// Due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// Estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Ordering position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// Tags; use `add_tag` to keep them duplicate-free
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Free-form metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// Board to create the task on (required)
    #[validate(length(min = 1, message = "Board is required"))]
    pub board_id: String,

    /// User to assign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,

    /// Parent task, when creating a subtask
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

impl CreateTask {
    /// Creates a task payload with the required fields set
    pub fn new(title: impl Into<String>, board_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            start_date: None,
            estimated_hours: None,
            position: None,
            tags: None,
            metadata: None,
            board_id: board_id.into(),
            assigned_user_id: None,
            parent_task_id: None,
        }
    }

    /// Appends a tag, preserving order and rejecting duplicates
    ///
    /// Returns `true` if the tag was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tags = self.tags.get_or_insert_with(Vec::new);
        if tags.iter().any(|t| t == &tag) {
            return false;
        }
        tags.push(tag);
        true
    }
}

/// Input for updating a task; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// New priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    /// New due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// New start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// New estimate in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// New ordering position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// Replacement tag list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// New metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// New assignee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,

    /// New completion timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// Appends a tag to the replacement list, rejecting duplicates
    ///
    /// Returns `true` if the tag was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tags = self.tags.get_or_insert_with(Vec::new);
        if tags.iter().any(|t| t == &tag) {
            return false;
        }
        tags.push(tag);
        true
    }
}

/// Filters for the task list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Filter by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Filter by priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    /// Filter by board
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,

    /// Filter by assignee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,
}

impl TaskFilters {
    /// Serializes the filters to query parameters, skipping absent fields
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            query.push(("priority".to_string(), priority.as_str().to_string()));
        }
        if let Some(board_id) = &self.board_id {
            query.push(("boardId".to_string(), board_id.clone()));
        }
        if let Some(assigned_user_id) = &self.assigned_user_id {
            query.push(("assignedUserId".to_string(), assigned_user_id.clone()));
        }

        query
    }
}

/// Filters for the my-tasks endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyTasksFilters {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Filter by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl MyTasksFilters {
    /// Serializes the filters to query parameters, skipping absent fields
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::InReview.as_str(), "in_review");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_wire_round_trip() {
        let status: TaskStatus = serde_json::from_str("\"in_review\"").unwrap();
        assert_eq!(status, TaskStatus::InReview);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"in_review\"");
    }

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_add_tag_rejects_duplicates() {
        let mut payload = CreateTask::new("Write docs", "b1");
        assert!(payload.add_tag("docs"));
        assert!(payload.add_tag("release"));
        assert!(!payload.add_tag("docs"));
        assert_eq!(payload.tags.as_deref(), Some(&["docs".to_string(), "release".to_string()][..]));
    }

    #[test]
    fn test_update_task_add_tag_starts_replacement_list() {
        let mut payload = UpdateTask::default();
        assert!(payload.add_tag("release"));
        assert!(!payload.add_tag("release"));
        assert_eq!(payload.tags.as_deref(), Some(&["release".to_string()][..]));
    }

    #[test]
    fn test_create_task_requires_board_id() {
        let payload = CreateTask::new("Write docs", "");
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("board_id"));
    }

    #[test]
    fn test_create_task_requires_title() {
        let payload = CreateTask::new("", "b1");
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_task_filters_to_query() {
        let filters = TaskFilters {
            status: Some(TaskStatus::InProgress),
            board_id: Some("b1".to_string()),
            assigned_user_id: Some("u1".to_string()),
            ..Default::default()
        };

        let query = filters.to_query();
        assert_eq!(
            query,
            vec![
                ("status".to_string(), "in_progress".to_string()),
                ("boardId".to_string(), "b1".to_string()),
                ("assignedUserId".to_string(), "u1".to_string()),
            ]
        );
    }

    #[test]
    fn test_subtasks_nest_one_level() {
        let body = serde_json::json!({
            "id": "t1",
            "title": "Parent",
            "status": "todo",
            "priority": "low",
            "tags": [],
            "metadata": {},
            "boardId": "b1",
            "createdById": "u1",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "subTasks": [{
                "id": "t2",
                "title": "Child",
                "status": "done",
                "priority": "high",
                "tags": [],
                "metadata": {},
                "boardId": "b1",
                "createdById": "u1",
                "parentTaskId": "t1",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }]
        });

        let task: Task = serde_json::from_value(body).unwrap();
        let subs = task.sub_tasks.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].parent_task_id.as_deref(), Some("t1"));
        assert!(subs[0].sub_tasks.is_none());
    }
}
