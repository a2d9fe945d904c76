/// Query and mutation façades
///
/// One façade per domain, composing the domain service, the query cache,
/// the authorization policy, the session store, and the notifier. Views
/// declare what data they need against these façades and never touch the
/// service or cache directly.
///
/// # Notification discipline
///
/// Exactly one notice per outcome:
///
/// - HTTP failures are noticed by the transport; the façades pass those
///   errors through silently.
/// - Failures that never reach the network (input validation, a rejected
///   concurrent mutation, a local authorization denial) are noticed here.
/// - Every successful mutation produces one success notice here. Reads
///   produce none.
///
/// # Modules
///
/// - `auth`: session lifecycle (login, register, logout, refresh)
/// - `boards`: board reads and mutations, membership management
/// - `tasks`: task reads and mutations
/// - `users`: user administration, gated on the policy

pub mod auth;
pub mod boards;
pub mod tasks;
pub mod users;

pub use auth::AuthQueries;
pub use boards::BoardQueries;
pub use tasks::TaskQueries;
pub use users::UserQueries;

use std::sync::Arc;

use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::notify::{Notice, Notifier};

/// Validates an input payload, noticing the failure locally
///
/// Runs before any network call: an invalid form never produces a request.
pub(crate) fn validated<T: Validate>(payload: &T, notifier: &Arc<dyn Notifier>) -> ClientResult<()> {
    if let Err(errors) = payload.validate() {
        let error = ClientError::from(errors);
        notifier.notify(Notice::error(error.notice_message()));
        return Err(error);
    }
    Ok(())
}

/// Surfaces mutation errors that originate inside the client
///
/// A rejected concurrent mutation never reached the transport, so its one
/// notice is emitted here; every other error already produced one.
pub(crate) fn surface_mutation_error(notifier: &Arc<dyn Notifier>, error: ClientError) -> ClientError {
    if let ClientError::MutationInFlight { .. } = &error {
        notifier.notify(Notice::error(error.notice_message()));
    }
    error
}
