//! LinkUMKM domain core.
//!
//! Pure domain logic shared by the API server and the janitor CLI. Nothing in
//! this crate touches the database; repositories live in `linkumkm_db`.

pub mod article;
pub mod content;
pub mod error;
pub mod links;
pub mod orphans;
pub mod roles;
pub mod slug;
pub mod types;
pub mod uploads;
