//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` request DTOs for inserts and updates
//! - Read models for joined listings where the API needs them

pub mod analytics;
pub mod article;
pub mod article_category;
pub mod category;
pub mod link;
pub mod linktree;
pub mod user;
