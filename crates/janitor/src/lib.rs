//! Orphaned-upload janitor.
//!
//! Lists the local upload directory, collects every upload reference stored
//! in the database (including `<img>` tags inside article HTML) and removes
//! the files nothing points at.

pub mod cleanup;
pub mod cli;
