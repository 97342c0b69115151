//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use snipvault_auth::JwtDecoder;
use snipvault_core::config::AppConfig;
use snipvault_core::result::AppResult;
use snipvault_core::traits::DocumentStore;
use snipvault_service::{FolderService, KeywordLanguageDetector, ShareService, SnippetService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store backing every service
    pub store: Arc<dyn DocumentStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Snippet lifecycle service
    pub snippet_service: Arc<SnippetService>,
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// Share link service
    pub share_service: Arc<ShareService>,
}

impl AppState {
    /// Wires every service onto `store` using `config`.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let snippet_service = SnippetService::new(
            Arc::clone(&store),
            Arc::new(KeywordLanguageDetector::new()),
            &config.snippets,
            &config.store,
        )?;
        let folder_service = FolderService::new(Arc::clone(&store), &config.store);
        let share_service = ShareService::new(Arc::clone(&store), &config.snippets);

        Ok(Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            snippet_service: Arc::new(snippet_service),
            folder_service: Arc::new(folder_service),
            share_service: Arc::new(share_service),
            config: Arc::new(config),
            store,
        })
    }
}
