/// Board model and related payloads
///
/// A board's member list and task count are fetched independently of the
/// board record itself and are only eventually consistent with it; nothing
/// here assumes the embedded `_count` block matches a separately fetched
/// member list.
///
/// The board creator is an implicit "owner": ownership is derived by
/// comparing a user ID against `createdById`, never stored as a member role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::member::BoardMember;
use super::user::{OrganizationSummary, UserSummary};

/// Board visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardVisibility {
    /// Visible to everyone, including guests
    Public,

    /// Visible to members only
    Private,

    /// Visible to the owning organization
    Organization,
}

impl BoardVisibility {
    /// Converts visibility to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardVisibility::Public => "public",
            BoardVisibility::Private => "private",
            BoardVisibility::Organization => "organization",
        }
    }
}

/// Aggregate counts embedded in a board record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCounts {
    /// Number of tasks on the board
    #[serde(default)]
    pub tasks: u64,

    /// Number of members on the board
    #[serde(default)]
    pub members: u64,
}

/// Board as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique board ID
    pub id: String,

    /// Board name
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Visibility
    pub visibility: BoardVisibility,

    /// Accent color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Icon identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Ordering position among sibling boards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// Whether the board is archived
    pub is_archived: bool,

    /// Free-form metadata attached by the server
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// ID of the creating user (the implicit owner)
    pub created_by_id: String,

    /// Owning organization, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker, if the server exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Creator summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummary>,

    /// Organization summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationSummary>,

    /// Member list, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<BoardMember>>,

    /// Aggregate counts, when the endpoint includes them
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<BoardCounts>,
}

impl Board {
    /// Checks whether the given user created (and therefore owns) the board
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by_id == user_id
    }
}

/// Input for creating a board
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    /// Board name
    #[validate(length(min = 1, max = 100, message = "Board name must be 1-100 characters"))]
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Visibility (server defaults to private when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<BoardVisibility>,

    /// Accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Icon identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Ordering position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// Free-form metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// Owning organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl CreateBoard {
    /// Creates a board payload with only the required name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: None,
            color: None,
            icon: None,
            position: None,
            metadata: None,
            organization_id: None,
        }
    }
}

/// Input for updating a board; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoard {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<BoardVisibility>,

    /// New accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// New icon identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// New ordering position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// New metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// New archived flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

/// Filters for board list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFilters {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Filter by visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<BoardVisibility>,

    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Filter by archived flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl BoardFilters {
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
        if let Some(visibility) = self.visibility {
            query.push(("visibility".to_string(), visibility.as_str().to_string()));
        }
        if let Some(organization_id) = &self.organization_id {
            query.push(("organizationId".to_string(), organization_id.clone()));
        }
        if let Some(is_archived) = self.is_archived {
            query.push(("isArchived".to_string(), is_archived.to_string()));
        }

        query
    }
}

/// Aggregate board statistics for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    /// Total board count
    pub total_boards: u64,

    /// Public boards
    pub public_boards: u64,

    /// Private boards
    pub private_boards: u64,

    /// Organization-scoped boards
    pub organization_boards: u64,

    /// Boards created by the current user
    pub my_boards: u64,
}
