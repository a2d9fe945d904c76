/// Cache identity types
///
/// A cached query is identified by its scope (one cache namespace per list
/// or by-id view of an entity kind) plus the canonical serialization of its
/// filter object. Serializing the filter struct makes "structurally equal
/// filters share an entry" hold by construction: equal structs produce equal
/// JSON, and any differing field produces a different ident.

use std::fmt;

use serde::Serialize;

use crate::error::{ClientError, ClientResult};

/// Cache namespace of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    /// Board list with filters
    Boards,

    /// The current user's boards
    MyBoards,

    /// Unfiltered board lookup for selection widgets
    AllBoards,

    /// Board by id
    Board,

    /// Member list of one board
    BoardMembers,

    /// Task list with filters
    Tasks,

    /// The current user's tasks
    MyTasks,

    /// Task by id
    Task,

    /// User list with filters
    Users,

    /// Unfiltered user lookup for assignment pickers
    AllUsers,

    /// User by id
    User,
}

impl QueryScope {
    /// Converts the scope to its cache-namespace string
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryScope::Boards => "boards",
            QueryScope::MyBoards => "my-boards",
            QueryScope::AllBoards => "all-boards",
            QueryScope::Board => "board",
            QueryScope::BoardMembers => "board-members",
            QueryScope::Tasks => "tasks",
            QueryScope::MyTasks => "my-tasks",
            QueryScope::Task => "task",
            QueryScope::Users => "users",
            QueryScope::AllUsers => "all-users",
            QueryScope::User => "user",
        }
    }
}

/// Identity of one cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Cache namespace
    pub scope: QueryScope,

    /// Canonical serialization of the filter object, or the entity id
    pub ident: String,
}

impl QueryKey {
    /// Builds the key for a list query from its filter object
    pub fn list<F: Serialize>(scope: QueryScope, filters: &F) -> ClientResult<Self> {
        let ident = serde_json::to_string(filters)
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        Ok(Self { scope, ident })
    }

    /// Builds the key for a by-id query
    pub fn entity(scope: QueryScope, id: impl Into<String>) -> Self {
        Self { scope, ident: id.into() }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope.as_str(), self.ident)
    }
}

/// Remote entity kinds, used to scope mutation serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Board
    Board,

    /// Board membership relation
    BoardMember,

    /// Task
    Task,

    /// User
    User,
}

impl EntityKind {
    /// Converts the kind to a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Board => "board",
            EntityKind::BoardMember => "board member",
            EntityKind::Task => "task",
            EntityKind::User => "user",
        }
    }
}

/// What a mutation is aimed at
///
/// Mutations against a specific entity id are serialized: a second one for
/// the same `(kind, id)` is rejected while the first is in flight. Creates
/// target the collection and are not serialized against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationTarget {
    /// A create against the entity kind's collection
    Collection(EntityKind),

    /// A change to one existing entity
    Entity(EntityKind, String),
}

/// One invalidation a successful mutation applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidate {
    /// Mark every entry in a scope stale
    Scope(QueryScope),

    /// Mark one specific entry stale
    Key(QueryKey),
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_shared::models::board::{BoardFilters, BoardVisibility};

    #[test]
    fn test_scope_as_str() {
        assert_eq!(QueryScope::Boards.as_str(), "boards");
        assert_eq!(QueryScope::MyBoards.as_str(), "my-boards");
        assert_eq!(QueryScope::BoardMembers.as_str(), "board-members");
        assert_eq!(QueryScope::AllUsers.as_str(), "all-users");
    }

    #[test]
    fn test_structurally_equal_filters_share_a_key() {
        let a = BoardFilters { page: Some(1), visibility: Some(BoardVisibility::Public), ..Default::default() };
        let b = BoardFilters { page: Some(1), visibility: Some(BoardVisibility::Public), ..Default::default() };

        let key_a = QueryKey::list(QueryScope::Boards, &a).unwrap();
        let key_b = QueryKey::list(QueryScope::Boards, &b).unwrap();
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn test_any_differing_field_means_a_distinct_key() {
        let a = BoardFilters { page: Some(1), ..Default::default() };
        let b = BoardFilters { page: Some(2), ..Default::default() };

        let key_a = QueryKey::list(QueryScope::Boards, &a).unwrap();
        let key_b = QueryKey::list(QueryScope::Boards, &b).unwrap();
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn test_same_filters_different_scope_are_distinct() {
        let filters = BoardFilters::default();
        let a = QueryKey::list(QueryScope::Boards, &filters).unwrap();
        let b = QueryKey::list(QueryScope::MyBoards, &filters).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_key_display() {
        let key = QueryKey::entity(QueryScope::Board, "b1");
        assert_eq!(key.to_string(), "board:b1");
    }
}
