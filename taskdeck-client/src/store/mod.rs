/// Global client state
///
/// Process-wide state with an explicit load/save lifecycle: the
/// authentication session and the UI layout preferences. Both are restored
/// from durable storage on construction (a pure deserialize, never a
/// network call) and written back on every change.
///
/// # Modules
///
/// - [`backend`]: the durable storage abstraction (file-backed or in-memory)
/// - [`session`]: the authentication session store
/// - [`prefs`]: UI layout preferences

pub mod backend;
pub mod prefs;
pub mod session;

pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use prefs::{Theme, UiPrefsStore};
pub use session::{SessionState, SessionStore};
