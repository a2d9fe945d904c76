/// Authorization rules for Taskdeck
///
/// This module is the single place where roles are compared. Every surface
/// that needs to decide whether an action is offered, or which rows of a
/// cached list a viewer may see, goes through [`authorization`].
///
/// # Modules
///
/// - [`authorization`]: capability checks and list-visibility filtering

pub mod authorization;
