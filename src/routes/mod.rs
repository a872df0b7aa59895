/// Router Module Index
///
/// Routes are grouped by the gates in front of them. `create_router` applies
/// the gates as route layers on each group, so a handler can only be reached
/// through the group it is registered in.

/// Routes open to anonymous callers: health, registration, login.
pub mod public;

/// Routes behind the authentication gate.
pub mod authenticated;

/// Routes behind the authentication gate and the admin role gate.
pub mod admin;
