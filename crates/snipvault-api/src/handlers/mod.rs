//! HTTP request handlers, grouped by resource.

pub mod folder;
pub mod health;
pub mod share;
pub mod snippet;
pub mod trash;
