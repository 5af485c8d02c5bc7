// TodoStore - Timed to-do list with filtered views and key-value persistence

pub mod action;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod render;
pub mod storage;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use action::{Action, Confirm};
pub use config::Config;
pub use error::{Field, FieldError, StorageError, StoreError, ValidationError};
pub use filter::Filter;
pub use render::{escape_html, format_time};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{Change, DEFAULT_SLOT_KEY, Stats, TaskStore};
pub use task::{InvalidTime, Task, TaskId, TaskTime, now_ms};
