//! TaskSync client I/O.
//!
//! REST adapter and push channel manager for the TaskSync backend.

pub mod api;
pub mod config;
pub mod error;
pub mod push;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use push::{PushChannel, Subscription};
