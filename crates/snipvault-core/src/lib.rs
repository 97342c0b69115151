//! # snipvault-core
//!
//! Core crate for SnipVault. Contains the collaborator traits (document
//! store, language heuristic), configuration schemas, typed identifiers,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other SnipVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
