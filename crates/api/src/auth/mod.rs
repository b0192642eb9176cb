//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT session-token generation and validation.
//! - [`cookie`] -- The `linkumkm_session` cookie carrying the token for browsers.

pub mod cookie;
pub mod jwt;
pub mod password;
