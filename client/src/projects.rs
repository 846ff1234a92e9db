// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::api::ApiClient;
use crate::collection::Collection;
use crate::error::{ApiError, StoreError};
use crate::events::{EventBus, StoreEvent};
use crate::stats::percent;

use common::{Project, ProjectDraft, ProjectPatch, Task};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Non-deleted task counts of one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectTaskCount {
    pub total: usize,
    pub completed: usize,
}

impl ProjectTaskCount {
    pub fn completion_rate(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Per-project counts over `tasks`, skipping the trash. Keys are the
/// referenced project ids, dangling ones included.
pub fn task_counts_by_project(tasks: &[Task]) -> HashMap<String, ProjectTaskCount> {
    let mut counts: HashMap<String, ProjectTaskCount> = HashMap::new();
    for task in tasks.iter().filter(|t| !t.is_deleted) {
        if let Some(project_id) = task.project_id.as_deref() {
            let count = counts.entry(project_id.to_string()).or_default();
            count.total += 1;
            if task.is_complete {
                count.completed += 1;
            }
        }
    }
    counts
}

/// A cached project with its live counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project: Project,
    pub counts: ProjectTaskCount,
    pub completion_rate: u32,
}

/// Tasks of one project; `project` is `None` for the "no project" group.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup {
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Default)]
struct ProjectState {
    projects: Collection<Project>,
    loading: bool,
    error: Option<String>,
}

/// Client-side cache of the viewer's projects.
///
/// Same protocol as the task store: the cache only changes from a confirmed
/// server answer. It reads task collections handed to it but never owns or
/// alters them; deleting a project leaves its tasks alone.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    api: ApiClient,
    events: EventBus,
    state: Arc<RwLock<ProjectState>>,
}

impl ProjectStore {
    pub fn new(api: ApiClient, events: EventBus) -> Self {
        Self {
            api,
            events,
            state: Arc::new(RwLock::new(ProjectState::default())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state.read().projects.to_vec()
    }

    pub fn get(&self, id: &str) -> Option<Project> {
        self.state.read().projects.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().projects.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub async fn fetch(&self) -> Result<(), StoreError> {
        if !self.api.session().is_signed_in() {
            debug!("No viewer, skipping project fetch.");
            return Ok(());
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        self.events.publish(StoreEvent::ProjectsChanged);

        let result = self.api.list_projects().await;
        self.apply_fetch(result)
    }

    fn apply_fetch(&self, result: Result<Vec<Project>, ApiError>) -> Result<(), StoreError> {
        let outcome = {
            let mut state = self.state.write();
            state.loading = false;
            match result {
                Ok(projects) => {
                    info!("Successfully retrieved {} projects.", projects.len());
                    state.projects.replace_all(projects);
                    Ok(())
                }
                Err(err) => {
                    let store_err = StoreError::from_api(&err, "Failed to fetch projects");
                    if store_err.is_reported() {
                        error!("Failed to fetch projects: {}", err);
                        state.error = Some("Failed to fetch projects".to_string());
                    } else {
                        debug!("Project fetch skipped: {}", err);
                    }
                    Err(store_err)
                }
            }
        };

        self.events.publish(StoreEvent::ProjectsChanged);
        if let Err(err) = &outcome {
            if err.is_reported() {
                self.events.error("Failed to fetch projects");
            }
        }
        outcome
    }

    pub async fn create(&self, draft: ProjectDraft) -> Result<Project, StoreError> {
        debug!("Creating project '{}'", draft.name);

        let project = self
            .api
            .create_project(&draft)
            .await
            .map_err(|err| self.fail("Failed to create project", err))?;

        self.state.write().projects.prepend(project.clone());
        info!("Project created successfully with ID: {}", project.id);
        self.changed("Project created successfully");
        Ok(project)
    }

    pub async fn update(&self, id: &str, patch: ProjectPatch) -> Result<Project, StoreError> {
        debug!("Updating project with ID: {}", id);

        let project = self
            .api
            .update_project(id, &patch)
            .await
            .map_err(|err| self.fail("Failed to update project", err))?;

        self.state.write().projects.replace(project.clone());
        info!("Project with ID {} updated.", id);
        self.changed("Project updated successfully");
        Ok(project)
    }

    /// Deletes a project. Its tasks keep their now dangling reference and are
    /// grouped under "no project" from then on.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!("Deleting project with ID: {}", id);

        self.api
            .delete_project(id)
            .await
            .map_err(|err| self.fail("Failed to delete project", err))?;

        self.state.write().projects.remove(id);
        info!("Project with ID {} deleted.", id);
        self.changed("Project deleted successfully");
        Ok(())
    }

    /// See [`task_counts_by_project`].
    pub fn task_counts_by_project(&self, tasks: &[Task]) -> HashMap<String, ProjectTaskCount> {
        task_counts_by_project(tasks)
    }

    /// Every cached project with its counts over `tasks`, in list order.
    pub fn summaries(&self, tasks: &[Task]) -> Vec<ProjectSummary> {
        let counts = task_counts_by_project(tasks);
        self.state
            .read()
            .projects
            .as_slice()
            .iter()
            .map(|project| {
                let counts = counts.get(&project.id).copied().unwrap_or_default();
                ProjectSummary {
                    project: project.clone(),
                    counts,
                    completion_rate: counts.completion_rate(),
                }
            })
            .collect()
    }

    /// Groups non-deleted tasks by cached project, in project list order.
    /// Tasks without a project, or whose project is gone, form a trailing
    /// "no project" group. Empty groups are left out.
    pub fn group_tasks(&self, tasks: &[Task]) -> Vec<TaskGroup> {
        let state = self.state.read();
        let mut by_project: HashMap<&str, Vec<Task>> = HashMap::new();
        let mut loose = Vec::new();

        for task in tasks.iter().filter(|t| !t.is_deleted) {
            match task.project_id.as_deref() {
                Some(project_id) if state.projects.contains(project_id) => {
                    by_project.entry(project_id).or_default().push(task.clone());
                }
                _ => loose.push(task.clone()),
            }
        }

        let mut groups: Vec<TaskGroup> = state
            .projects
            .as_slice()
            .iter()
            .filter_map(|project| {
                by_project
                    .remove(project.id.as_str())
                    .map(|tasks| TaskGroup {
                        project: Some(project.clone()),
                        tasks,
                    })
            })
            .collect();

        if !loose.is_empty() {
            groups.push(TaskGroup {
                project: None,
                tasks: loose,
            });
        }
        groups
    }

    fn changed(&self, notice: &str) {
        self.events.publish(StoreEvent::ProjectsChanged);
        self.events.success(notice);
    }

    fn fail(&self, fallback: &str, err: ApiError) -> StoreError {
        let store_err = StoreError::from_api(&err, fallback);
        if store_err.is_reported() {
            error!("{}: {}", fallback, err);
            self.events.error(store_err.to_string());
        } else {
            debug!("{} skipped: {}", fallback, err);
        }
        store_err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use crate::session::Session;
    use chrono::Utc;
    use common::Priority;
    use reqwest::{StatusCode, Url};

    fn store() -> ProjectStore {
        let url = Url::parse("http://localhost:5000").unwrap();
        ProjectStore::new(ApiClient::new(url, Arc::new(Session::new())), EventBus::new())
    }

    fn task(id: &str, project: Option<&str>, done: bool, deleted: bool) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            project_id: project.map(str::to_string),
            is_complete: done,
            is_deleted: deleted,
            created_at: Utc::now(),
            completed_at: None,
            updated_at: None,
            project: None,
        }
    }

    #[test]
    fn test_counts_skip_trash() {
        let tasks = vec![
            task("a", Some("p1"), false, false),
            task("b", Some("p1"), true, false),
            task("c", Some("p1"), true, true),
            task("d", Some("p2"), false, false),
            task("e", None, true, false),
        ];

        let counts = task_counts_by_project(&tasks);

        assert_eq!(
            counts["p1"],
            ProjectTaskCount {
                total: 2,
                completed: 1
            }
        );
        assert_eq!(counts["p1"].completion_rate(), 50);
        assert_eq!(counts["p2"].completion_rate(), 0);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_empty_project_rate_is_zero() {
        assert_eq!(ProjectTaskCount::default().completion_rate(), 0);
    }

    #[test]
    fn test_two_of_three_rounds_up() {
        let tasks = vec![
            task("a", Some("p1"), true, false),
            task("b", Some("p1"), true, false),
            task("c", Some("p1"), false, false),
        ];
        assert_eq!(task_counts_by_project(&tasks)["p1"].completion_rate(), 67);
    }

    #[test]
    fn test_fetch_without_viewer_records_no_error() {
        let store = store();
        let mut rx = store.subscribe();
        store.state.write().loading = true;

        let result = store.apply_fetch(Err(ApiError::NoViewer));

        assert_eq!(result, Err(StoreError::NoViewer));
        assert_eq!(store.last_error(), None);
        assert!(!store.is_loading());
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ProjectsChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_fetch_records_error() {
        let store = store();
        let rejected = ApiError::Rejected {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: ErrorBody::default(),
        };

        let result = store.apply_fetch(Err(rejected));

        assert_eq!(
            result,
            Err(StoreError::Failed("Failed to fetch projects".to_string()))
        );
        assert_eq!(store.last_error().as_deref(), Some("Failed to fetch projects"));
    }
}
