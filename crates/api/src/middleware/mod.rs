//! Request extractors that resolve the caller's session.
//!
//! - [`auth::AuthUser`] -- The logged-in user behind the session cookie.

pub mod auth;
