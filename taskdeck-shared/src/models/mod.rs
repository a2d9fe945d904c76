/// Domain models for Taskdeck
///
/// This module contains the client-side view of every remote entity, the
/// input payloads used to create and update them, the filter types for list
/// endpoints, and the response envelopes the API wraps everything in.
///
/// # Models
///
/// - `user`: user accounts, roles, and statuses
/// - `board`: boards, visibility, and ownership
/// - `member`: board membership relations and member roles
/// - `task`: tasks, statuses, priorities, tags, and subtasks
/// - `auth`: login/registration payloads and the auth response
/// - `envelope`: `{ message, response, pagination? }` response wrappers
///
/// All entities are owned by the server; the client only ever holds cached
/// copies of them. Wire field names are camelCase and enum values match the
/// API's snake_case strings.

pub mod auth;
pub mod board;
pub mod envelope;
pub mod member;
pub mod task;
pub mod user;

pub use auth::{AuthPayload, AuthResponse, ChangePassword, LoginCredentials, RegisterCredentials};
pub use board::{Board, BoardCounts, BoardFilters, BoardStats, BoardVisibility, CreateBoard, UpdateBoard};
pub use envelope::{EntityResponse, ListResponse, MessageResponse, Pagination};
pub use member::{BoardMember, BoardMemberRole, MemberUser};
pub use task::{CreateTask, MyTasksFilters, Task, TaskFilters, TaskPriority, TaskStatus, UpdateTask};
pub use user::{CreateUser, UpdateUser, User, UserCounts, UserFilters, UserRole, UserStats, UserStatus};
