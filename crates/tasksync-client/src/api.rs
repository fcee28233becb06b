//! REST adapter for the TaskSync backend.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use tasksync_core::session::model::{Employee, Role, Session, User};
use tasksync_core::task::model::{Task, TaskDraft, TaskPatch, TaskStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of login and register responses.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

/// Error body the backend attaches to rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP adapter for the auth, manager and employee endpoints.
///
/// Every call resolves to a `ClientResult`; nothing panics across this
/// boundary. Authenticated calls short-circuit with `Unauthorized` when no
/// token is held, before any request goes out.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        debug!(base_url = %config.api_url, "api client initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: config.api_url.clone(),
            token: None,
        }
    }

    /// Attach the bearer token used for authenticated calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace or drop the held token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Sign in and return the resulting session. The caller decides whether
    /// to persist it; nothing is stored on failure.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        debug!(email = %email, "logging in");
        let response = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        Ok(Session {
            user: auth.user,
            token: auth.token,
        })
    }

    /// Register a new account and return the signed-in session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ClientResult<Session> {
        debug!(email = %email, role = %role.as_str(), "registering");
        let response = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "role": role.as_str(),
            }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        Ok(Session {
            user: auth.user,
            token: auth.token,
        })
    }

    /// Employees available for task assignment.
    pub async fn employees(&self) -> ClientResult<Vec<Employee>> {
        self.get_json("/api/v1/auth/employees").await
    }

    /// Tasks created by the signed-in manager.
    pub async fn created_tasks(&self) -> ClientResult<Vec<Task>> {
        self.get_json("/api/v1/manager/created").await
    }

    /// Tasks assigned to the signed-in employee.
    pub async fn my_tasks(&self) -> ClientResult<Vec<Task>> {
        self.get_json("/api/v1/employee/my-tasks").await
    }

    /// Create a task. The draft is validated before anything is sent.
    pub async fn create_task(&self, draft: &TaskDraft) -> ClientResult<Task> {
        draft
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        debug!(title = %draft.title, "creating task");
        let response = self
            .client
            .post(self.url("/api/v1/manager/create"))
            .header(AUTHORIZATION, self.bearer()?)
            .json(draft)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Update task fields. Manager endpoint; returns the updated task.
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> ClientResult<Task> {
        debug!(task_id = %id, "updating task");
        let response = self
            .client
            .put(self.url(&format!("/api/v1/manager/{id}")))
            .header(AUTHORIZATION, self.bearer()?)
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Delete a task. Returns the deleted task.
    pub async fn delete_task(&self, id: &str) -> ClientResult<Task> {
        debug!(task_id = %id, "deleting task");
        let response = self
            .client
            .delete(self.url(&format!("/api/v1/manager/{id}")))
            .header(AUTHORIZATION, self.bearer()?)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Move a task to a new status. Employee endpoint; only the status field
    /// is honored server-side.
    pub async fn update_status(&self, id: &str, status: TaskStatus) -> ClientResult<Task> {
        debug!(task_id = %id, status = %status.as_str(), "updating task status");
        let response = self
            .client
            .put(self.url(&format!("/api/v1/employee/{id}/status")))
            .header(AUTHORIZATION, self.bearer()?)
            .json(&TaskPatch::status(status))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer header value, or `Unauthorized` before any network traffic.
    fn bearer(&self) -> ClientResult<String> {
        match &self.token {
            Some(token) => Ok(format!("Bearer {token}")),
            None => Err(ClientError::Unauthorized),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let bearer = self.bearer()?;
        let response = self
            .client
            .get(self.url(path))
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Map non-success statuses into the client error taxonomy.
    async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = read_error_message(response).await;
        match status.as_u16() {
            401 | 403 => Err(ClientError::Unauthorized),
            404 => Err(ClientError::NotFound(message)),
            400 | 422 => Err(ClientError::Validation(message)),
            code => Err(ClientError::Api {
                status: code,
                message,
            }),
        }
    }
}

/// Best-effort extraction of a human message from an error response.
async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message.or(body.error).unwrap_or(text),
        Err(_) if text.is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => text,
    }
}
