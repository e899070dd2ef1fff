pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod kv;
pub mod models;

pub use history::{HistoryStore, UpsertOutcome, HISTORY_LIMIT};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use models::WatchRecord;
