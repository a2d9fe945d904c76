/// Board membership relation
///
/// A membership links one user to one board with a role. The board's creator
/// never appears here as an "owner" role; ownership is derived from the
/// board's `createdById` (see `Board::is_owned_by`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a user within one board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMemberRole {
    /// Can manage the board and its members
    Admin,

    /// Can work with tasks on the board
    Member,

    /// Read-only access
    Viewer,
}

impl BoardMemberRole {
    /// Converts role to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardMemberRole::Admin => "admin",
            BoardMemberRole::Member => "member",
            BoardMemberRole::Viewer => "viewer",
        }
    }
}

/// Compact user reference embedded in a membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUser {
    /// User ID
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Membership of one user on one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    /// Unique membership ID
    pub id: String,

    /// Board ID
    pub board_id: String,

    /// User ID
    pub user_id: String,

    /// Role within the board
    pub role: BoardMemberRole,

    /// When the user joined the board
    pub joined_at: DateTime<Utc>,

    /// User summary, when expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<MemberUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(BoardMemberRole::Admin.as_str(), "admin");
        assert_eq!(BoardMemberRole::Member.as_str(), "member");
        assert_eq!(BoardMemberRole::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_board_member_wire_shape() {
        let body = serde_json::json!({
            "id": "m1",
            "boardId": "b1",
            "userId": "u1",
            "role": "viewer",
            "joinedAt": "2024-03-01T08:00:00Z",
            "user": {
                "id": "u1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com"
            }
        });

        let member: BoardMember = serde_json::from_value(body).unwrap();
        assert_eq!(member.board_id, "b1");
        assert_eq!(member.role, BoardMemberRole::Viewer);
        assert_eq!(member.user.unwrap().first_name, "Ada");
    }
}
