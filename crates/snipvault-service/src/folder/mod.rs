//! Folder store.

pub mod service;

pub use service::FolderService;
