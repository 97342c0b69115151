//! # snipvault-database
//!
//! Document store backends (in-memory and PostgreSQL), connection
//! management, migrations, and typed repositories for SnipVault entities.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{DocumentStoreManager, MemoryDocumentStore, PgDocumentStore};
