//! SQLite backend for the intake form snapshot store.

mod factory;
mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteSnapshotStore;
