/// Capability checks and list-visibility filtering
///
/// This module computes, from the current user and an entity's ownership and
/// assignment fields, which actions a surface may offer and which entities it
/// may display. All functions are pure; none perform I/O.
///
/// # Permission Model
///
/// 1. **Role hierarchy**: `super_admin` ⊇ `admin` ⊇ `user` ⊇ `guest` for
///    privilege checks, but capabilities are not strictly nested; guests
///    have a categorically narrower visibility, not merely fewer actions.
/// 2. **Ownership**: a board's creator may edit and delete it; a task's
///    creator may edit and delete it.
/// 3. **Assignment**: a task's assignee may edit it and change its status,
///    but may not delete it.
/// 4. **Visibility**: guests see only public boards; plain users see only
///    tasks assigned to them. This narrowing is applied on the client in
///    addition to whatever the server filtered, because a cached response
///    may be re-read under a different role context.
///
/// A missing or unrecognized role is treated as `guest`, never as an error.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization;
/// use taskdeck_shared::models::user::UserRole;
///
/// // Board creation is admin-only regardless of ownership rules.
/// assert!(!authorization::can_create_board(None));
/// ```

use crate::models::board::{Board, BoardVisibility};
use crate::models::task::Task;
use crate::models::user::{User, UserRole};

/// Resolves the effective role of an optional session user
///
/// No session, or a user whose role failed to parse, is a guest.
pub fn effective_role(actor: Option<&User>) -> UserRole {
    actor.map(|user| user.role).unwrap_or(UserRole::Guest)
}

/// Checks whether the actor holds an administrative role
pub fn is_admin(actor: Option<&User>) -> bool {
    effective_role(actor).is_admin()
}

/// Checks whether the actor is a super admin
pub fn is_super_admin(actor: Option<&User>) -> bool {
    effective_role(actor) == UserRole::SuperAdmin
}

/// Checks whether the actor is (effectively) a guest
pub fn is_guest(actor: Option<&User>) -> bool {
    effective_role(actor) == UserRole::Guest
}

// ---------------------------------------------------------------------------
// Board capabilities
// ---------------------------------------------------------------------------

/// Only admins may create boards; plain users and guests never can.
pub fn can_create_board(actor: Option<&User>) -> bool {
    is_admin(actor)
}

/// Admins and the board's creator may edit it.
pub fn can_edit_board(actor: Option<&User>, board: &Board) -> bool {
    match actor {
        Some(user) => user.role.is_admin() || board.is_owned_by(&user.id),
        None => false,
    }
}

/// Deletion follows the same rule as editing.
pub fn can_delete_board(actor: Option<&User>, board: &Board) -> bool {
    can_edit_board(actor, board)
}

/// Member management is admin-only; a creator without an admin role cannot
/// manage the member list of their own board.
pub fn can_manage_members(actor: Option<&User>) -> bool {
    is_admin(actor)
}

// ---------------------------------------------------------------------------
// Task capabilities
// ---------------------------------------------------------------------------

/// Admins, the task's creator, and the task's assignee may edit it.
pub fn can_edit_task(actor: Option<&User>, task: &Task) -> bool {
    match actor {
        Some(user) => {
            user.role.is_admin()
                || task.created_by_id == user.id
                || task.is_assigned_to(&user.id)
        }
        None => false,
    }
}

/// Admins and the task's creator may delete it; assignment alone does not
/// grant delete.
pub fn can_delete_task(actor: Option<&User>, task: &Task) -> bool {
    match actor {
        Some(user) => user.role.is_admin() || task.created_by_id == user.id,
        None => false,
    }
}

/// Only admins may reassign tasks.
pub fn can_assign_task(actor: Option<&User>) -> bool {
    is_admin(actor)
}

/// Guests never change status; otherwise admins and the assignee may.
pub fn can_change_task_status(actor: Option<&User>, task: &Task) -> bool {
    if is_guest(actor) {
        return false;
    }
    match actor {
        Some(user) => user.role.is_admin() || task.is_assigned_to(&user.id),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// User-management capabilities
// ---------------------------------------------------------------------------

/// Only admins may see the user-management surface at all.
pub fn can_view_user_management(actor: Option<&User>) -> bool {
    is_admin(actor)
}

/// Admins may edit users, except that only super admins may edit other
/// super admins.
pub fn can_edit_user(actor: Option<&User>, target: &User) -> bool {
    is_admin(actor) && (is_super_admin(actor) || target.role != UserRole::SuperAdmin)
}

/// Only super admins may delete users, and never themselves.
pub fn can_delete_user(actor: Option<&User>, target: &User) -> bool {
    match actor {
        Some(user) => user.role == UserRole::SuperAdmin && target.id != user.id,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// List visibility
// ---------------------------------------------------------------------------

/// Narrows a board list to what the actor may see
///
/// Guests see only public boards. Everyone else sees the list as returned by
/// the backend for the filter the view requested.
pub fn filter_visible_boards(actor: Option<&User>, boards: Vec<Board>) -> Vec<Board> {
    if is_guest(actor) {
        boards
            .into_iter()
            .filter(|board| board.visibility == BoardVisibility::Public)
            .collect()
    } else {
        boards
    }
}

/// Narrows a task list to what the actor may see
///
/// A plain `user` sees only tasks assigned to them; admins see everything,
/// and guests see whatever the (public) view handed in.
pub fn filter_visible_tasks(actor: Option<&User>, tasks: Vec<Task>) -> Vec<Task> {
    match actor {
        Some(user) if user.role == UserRole::User => tasks
            .into_iter()
            .filter(|task| task.is_assigned_to(&user.id))
            .collect(),
        _ => tasks,
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Landing route after a successful login
pub fn post_login_destination(role: UserRole) -> &'static str {
    if role.is_admin() {
        "/admin"
    } else {
        "/dashboard"
    }
}
