//! Client endpoint configuration.

/// Default REST endpoint of the TaskSync backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Default WebSocket endpoint of the notification service.
pub const DEFAULT_SOCKET_URL: &str = "ws://127.0.0.1:5000/ws";

/// Endpoints the client talks to.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub socket_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, socket_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            socket_url: socket_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Read `TASKSYNC_API_URL` and `TASKSYNC_SOCKET_URL`, falling back to the
    /// local defaults.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TASKSYNC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            std::env::var("TASKSYNC_SOCKET_URL").unwrap_or_else(|_| DEFAULT_SOCKET_URL.to_string()),
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_SOCKET_URL)
    }
}
