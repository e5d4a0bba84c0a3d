//! Core domain logic for the task tracker.
//! This crate is the single source of truth for task/project invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod selectors;
pub mod service;
pub mod storage;
pub mod store;

pub use codec::{decode, encode, try_decode, CodecError, CodecResult, DATE_FIELD_NAMES};
pub use config::{ConfigError, StoreConfig};
pub use ids::{IdError, IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::notification::{Notification, NotificationId, NotificationKind};
pub use model::project::{Project, ProjectId, ProjectStatus};
pub use model::task::{Comment, Task, TaskId, TaskStatus, TaskValidationError};
pub use model::{Priority, Timestamp};
pub use service::intake::{DraftError, ProjectDraft, TaskDraft};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageKey,
    StorageResult,
};
pub use store::{LoadReport, LoadSource, Store, StoreState, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
