//! Session state and authentication.

mod auth;
mod session;

pub use session::{AuthState, Credentials, Session};
