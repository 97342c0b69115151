//! Document store backends and the provider manager.

pub mod manager;
pub mod memory;
pub mod postgres;

pub use manager::DocumentStoreManager;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
