//! Session verification for the API.
//!
//! Users sign in with an external authentication service, which stores a
//! [token::Token] in a private cookie encrypted with the shared secret.

mod cookie;
mod middleware;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, set_session_cookie};
pub use middleware::session_guard;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub(crate) use middleware::SessionState;
