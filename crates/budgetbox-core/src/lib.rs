//! budgetbox-core
//!
//! Period accounting, state sanitization and persistence orchestration for budgetbox.
//! Depends on budgetbox-domain. No CLI, no terminal I/O, no concrete storage medium.

pub mod box_service;
pub mod error;
pub mod expense_service;
pub mod ids;
pub mod manager;
pub mod period;
pub mod sanitize;
pub mod storage;
pub mod store;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use box_service::*;
pub use error::{CoreError, StorageError};
pub use expense_service::*;
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use manager::BoxManager;
pub use period::{balance, period_key, rollover_if_needed};
pub use storage::{projected_size, KeyValueStore, MemoryStore};
pub use store::{SaveOutcome, StateStore, STATE_KEY};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
