/// User model and related payloads
///
/// Users carry two independent activity signals: a lifecycle `status`
/// (active/inactive/pending/suspended) and the `isActive` boolean toggled by
/// the admin list action. The client treats them as separate fields and never
/// derives one from the other.
///
/// Roles drive everything in `crate::auth::authorization`; no other module
/// compares role values directly.
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::user::UserRole;
///
/// // Unknown roles fall back to the most restrictive one.
/// let role: UserRole = serde_json::from_str("\"superuser\"").unwrap();
/// assert_eq!(role, UserRole::Guest);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Application-wide user role
///
/// Unrecognized wire values deserialize to `Guest` so that a malformed or
/// future role never grants more access than an anonymous visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full control, including managing other admins
    SuperAdmin,

    /// Can manage boards, tasks, and non-admin users
    Admin,

    /// Regular member: works with assigned tasks
    User,

    /// Read-only visitor; also the fallback for unknown roles
    #[serde(other)]
    Guest,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Guest
    }
}

impl UserRole {
    /// Converts role to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }

    /// Checks if this role carries administrative privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::Admin)
    }

    /// Checks if this role meets or exceeds the required role
    ///
    /// Hierarchy: SuperAdmin > Admin > User > Guest. Note that the guest
    /// role is not merely "fewer of the same actions"; visibility rules in
    /// `crate::auth::authorization` treat guests categorically.
    pub fn has_privilege(&self, required: &UserRole) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Returns numeric privilege level for comparison
    fn privilege_level(&self) -> u8 {
        match self {
            UserRole::SuperAdmin => 4,
            UserRole::Admin => 3,
            UserRole::User => 2,
            UserRole::Guest => 1,
        }
    }
}

/// User lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is in good standing
    Active,

    /// Account is disabled but retained
    Inactive,

    /// Account awaits email verification or admin approval
    Pending,

    /// Account has been suspended by an admin
    Suspended,
}

impl UserStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
            UserStatus::Suspended => "suspended",
        }
    }
}

/// Compact user reference embedded in other entities
///
/// The backend attaches these to boards, tasks, and memberships. The avatar
/// is optional and explicitly named rather than reached through a dynamic
/// index lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Avatar URL, when the user has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Compact organization reference embedded in users and boards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    /// Organization ID
    pub id: String,

    /// Organization name
    pub name: String,
}

/// Aggregate counts embedded in a user record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    /// Tasks created by the user
    #[serde(default)]
    pub created_tasks: u64,

    /// Tasks currently assigned to the user
    #[serde(default)]
    pub assigned_tasks: u64,

    /// Boards created by the user
    #[serde(default)]
    pub created_boards: u64,
}

/// User account as returned by the API
///
/// The canonical copy lives on the server; the client holds time-bounded
/// cached replicas only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Application role; missing or unrecognized values read as guest
    #[serde(default)]
    pub role: UserRole,

    /// Lifecycle status
    pub status: UserStatus,

    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Organization the user belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Admin-controlled activity toggle, independent of `status`
    pub is_active: bool,

    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,

    /// Last successful login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-deletion marker, if the server exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Organization summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationSummary>,

    /// Aggregate counts, when the endpoint includes them
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<UserCounts>,
}

impl User {
    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a user (admin surface)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// First name
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    /// Last name
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Initial password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role to assign (server defaults to `user` when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    /// Initial activity toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Department
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Organization to attach the user to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Input for updating a user; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New first name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// New last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// New email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// New role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    /// New lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,

    /// New phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// New job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// New department
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// New location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// New activity toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// New email-verified flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

/// Filters for the user list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Filter by role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    /// Filter by lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,

    /// Filter by organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Filter by activity toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// Filter by department
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserFilters {
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
        if let Some(role) = self.role {
            query.push(("role".to_string(), role.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(organization_id) = &self.organization_id {
            query.push(("organizationId".to_string(), organization_id.clone()));
        }
        if let Some(is_active) = self.is_active {
            query.push(("isActive".to_string(), is_active.to_string()));
        }
        if let Some(department) = &self.department {
            query.push(("department".to_string(), department.clone()));
        }

        query
    }
}

/// Aggregate user statistics for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Total user count
    pub total_users: u64,

    /// Users with the activity toggle on
    pub active_users: u64,

    /// Users with the activity toggle off
    pub inactive_users: u64,

    /// Users with an admin role
    pub admin_users: u64,

    /// Users with the plain `user` role
    pub regular_users: u64,

    /// Users created in the current calendar month
    pub new_users_this_month: u64,
}
