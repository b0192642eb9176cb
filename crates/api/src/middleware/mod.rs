//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The signed-in, active user from a Bearer token or session cookie.
//! - [`rbac::RequireAdmin`] -- Requires `ADMIN` or `SUPERADMIN`.

pub mod auth;
pub mod rbac;
