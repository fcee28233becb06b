//! TaskSync Core Library
//!
//! Domain models and client-side state for the TaskSync task manager.

pub mod error;
pub mod notify;
pub mod session;
pub mod task;

pub use error::{TaskSyncError, TaskSyncResult};
