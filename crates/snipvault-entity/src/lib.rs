//! # snipvault-entity
//!
//! Domain entity models for SnipVault. Every struct in this crate is either
//! a persisted document (snippet, folder, share link) or a domain value
//! object (patches, conflict modes, history entries). All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize` and are stored as JSON
//! documents by the document store.

pub mod folder;
pub mod share;
pub mod snippet;
