/// Domain services
///
/// Typed wrappers around the API transport: one async function per remote
/// operation, taking typed parameters and returning the typed response
/// envelope. Optional filter fields are serialized only when present;
/// absent fields never appear as empty query parameters.
///
/// Services never catch errors; whatever the transport produced propagates
/// unmodified to the caller.
///
/// # Modules
///
/// - `auth`: login, signup, logout, token refresh, password recovery
/// - `boards`: board CRUD, archiving, membership management
/// - `tasks`: task CRUD, assignment, status updates
/// - `users`: user administration

pub mod auth;
pub mod boards;
pub mod tasks;
pub mod users;

pub use auth::AuthService;
pub use boards::BoardService;
pub use tasks::TaskService;
pub use users::UserService;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Decodes a raw response value into its typed envelope
///
/// A mismatch here means the server broke its contract; it is logged and
/// surfaced to the caller, but produces no user notice (the transport owns
/// failure notices, and this value already arrived as a 2xx).
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|err| {
        tracing::error!(error = %err, "response did not match the expected shape");
        ClientError::Decode(err.to_string())
    })
}

/// Serializes a request body
pub(crate) fn body<T: serde::Serialize>(payload: &T) -> ClientResult<Value> {
    serde_json::to_value(payload).map_err(|err| ClientError::Decode(err.to_string()))
}
