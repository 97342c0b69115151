//! # snipvault-api
//!
//! HTTP API layer for SnipVault built on Axum.
//!
//! Provides the REST endpoints for snippets, folders, trash, and share
//! links, plus middleware (CORS, compression, request logging), the bearer
//! token extractor, DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
