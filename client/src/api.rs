// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::{ApiError, ErrorBody};
use crate::routes::Route;
use crate::session::Session;

use common::{FetchFilters, Project, ProjectDraft, ProjectPatch, Task, TaskDraft, TaskPatch};
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Deserialize, Debug)]
struct TasksEnvelope {
    tasks: Vec<Task>,
}

#[derive(Deserialize, Debug)]
struct TaskEnvelope {
    task: Task,
}

#[derive(Deserialize, Debug)]
struct ToggleEnvelope {
    task: Task,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ProjectsEnvelope {
    projects: Vec<Project>,
}

#[derive(Deserialize, Debug)]
struct ProjectEnvelope {
    project: Project,
}

/// HTTP client for the remote task service.
///
/// Every call is authenticated with the bearer token of the session's
/// viewer and refused locally when nobody is signed in.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, route: Route<'_>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(route.segments());
        }
        url
    }

    fn request(&self, method: Method, route: Route<'_>) -> Result<RequestBuilder, ApiError> {
        let token = self.session.bearer_token().ok_or(ApiError::NoViewer)?;
        debug!("{} {}", method, route);
        Ok(self
            .http
            .request(method, self.url(route))
            .bearer_auth(token))
    }

    /// Sends the request and decodes a JSON success payload.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let bytes = Self::send(builder).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a request whose success payload carries nothing (`{}` or 204).
    async fn execute_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        Self::send(builder).await.map(|_| ())
    }

    async fn send(builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        trace!("Response {} ({} bytes)", status, bytes.len());

        if !status.is_success() {
            let body = serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_default();
            return Err(ApiError::Rejected { status, body });
        }
        Ok(bytes.to_vec())
    }

    pub async fn list_tasks(&self, filters: &FetchFilters) -> Result<Vec<Task>, ApiError> {
        let mut builder = self.request(Method::GET, Route::Tasks)?;
        let pairs = filters.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        let envelope: TasksEnvelope = self.execute(builder).await?;
        Ok(envelope.tasks)
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let builder = self.request(Method::POST, Route::Tasks)?.json(draft);
        let envelope: TaskEnvelope = self.execute(builder).await?;
        Ok(envelope.task)
    }

    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        let builder = self.request(Method::PUT, Route::Task(id))?.json(patch);
        let envelope: TaskEnvelope = self.execute(builder).await?;
        Ok(envelope.task)
    }

    /// Flips completion server-side. Returns the canonical task and the
    /// server's confirmation message.
    pub async fn toggle_task(&self, id: &str) -> Result<(Task, Option<String>), ApiError> {
        let builder = self.request(Method::PATCH, Route::ToggleTask(id))?;
        let envelope: ToggleEnvelope = self.execute(builder).await?;
        Ok((envelope.task, envelope.message))
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, Route::Task(id))?;
        self.execute_empty(builder).await
    }

    pub async fn restore_task(&self, id: &str) -> Result<Task, ApiError> {
        let builder = self.request(Method::PATCH, Route::RestoreTask(id))?;
        let envelope: TaskEnvelope = self.execute(builder).await?;
        Ok(envelope.task)
    }

    pub async fn purge_task(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, Route::PermanentTask(id))?;
        self.execute_empty(builder).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let builder = self.request(Method::GET, Route::Projects)?;
        let envelope: ProjectsEnvelope = self.execute(builder).await?;
        Ok(envelope.projects)
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        let builder = self.request(Method::POST, Route::Projects)?.json(draft);
        let envelope: ProjectEnvelope = self.execute(builder).await?;
        Ok(envelope.project)
    }

    pub async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ApiError> {
        let builder = self.request(Method::PUT, Route::Project(id))?.json(patch);
        let envelope: ProjectEnvelope = self.execute(builder).await?;
        Ok(envelope.project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, Route::Project(id))?;
        self.execute_empty(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Viewer;

    fn client(base: &str, signed_in: bool) -> ApiClient {
        let session = if signed_in {
            Session::with_viewer(Viewer::new("u1", "Ada", "secret"))
        } else {
            Session::new()
        };
        ApiClient::new(Url::parse(base).unwrap(), Arc::new(session))
    }

    #[test]
    fn test_url_joins_route_under_base_path() {
        let api = client("http://localhost:5000/", true);
        assert_eq!(
            api.url(Route::ToggleTask("t1")).as_str(),
            "http://localhost:5000/api/tasks/t1/toggle"
        );

        let api = client("http://example.com/deck", true);
        assert_eq!(
            api.url(Route::Projects).as_str(),
            "http://example.com/deck/api/projects"
        );
    }

    #[test]
    fn test_url_encodes_ids() {
        let api = client("http://localhost:5000", true);
        assert_eq!(
            api.url(Route::Task("a/b")).as_str(),
            "http://localhost:5000/api/tasks/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_requests_refused_without_viewer() {
        let api = client("http://localhost:5000", false);
        let result = api.list_tasks(&FetchFilters::default()).await;
        assert!(matches!(result, Err(ApiError::NoViewer)));
    }
}
