pub mod connection;
pub mod error;
pub mod memory_identity_store;
pub mod sqlite_identity_store;

pub use connection::{MIGRATOR, connect, run_migrations};
pub use error::{DbError, Result};
pub use memory_identity_store::MemoryIdentityStore;
pub use sqlite_identity_store::SqliteIdentityStore;
