// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::api::ApiClient;
use crate::collection::Collection;
use crate::error::{ApiError, StoreError};
use crate::events::{EventBus, StoreEvent};
use crate::stats::TaskStats;

use chrono::{Local, NaiveDate};
use common::{FetchFilters, Task, TaskDraft, TaskFilter, TaskPatch};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
struct TaskState {
    tasks: Collection<Task>,
    loading: bool,
    error: Option<String>,
}

/// Client-side cache of the viewer's tasks.
///
/// Every mutation is two-phase: the request goes out first and the cache only
/// changes once the server has answered with the canonical entity. Nothing is
/// shown optimistically, so there is nothing to roll back on failure.
///
/// The store is a cheap handle; clones share the same cache. Responses are
/// applied in arrival order, so when two requests race on one task the last
/// answer wins.
#[derive(Debug, Clone)]
pub struct TaskStore {
    api: ApiClient,
    events: EventBus,
    state: Arc<RwLock<TaskState>>,
}

impl TaskStore {
    pub fn new(api: ApiClient, events: EventBus) -> Self {
        Self {
            api,
            events,
            state: Arc::new(RwLock::new(TaskState::default())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the cached tasks in render order.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.to_vec()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.state.read().tasks.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().tasks.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Cached tasks passing the local list filter.
    pub fn filtered(&self, filter: &TaskFilter) -> Vec<Task> {
        let state = self.state.read();
        filter
            .apply(state.tasks.as_slice())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Statistics against the current local day.
    pub fn stats(&self) -> TaskStats {
        self.stats_on(Local::now().date_naive())
    }

    pub fn stats_on(&self, today: NaiveDate) -> TaskStats {
        TaskStats::compute(self.state.read().tasks.as_slice(), today)
    }

    /// Replaces the cache with the server's result for `filters`.
    ///
    /// Skipped entirely while nobody is signed in. On failure the previous
    /// collection is kept and the error is recorded.
    pub async fn fetch(&self, filters: &FetchFilters) -> Result<(), StoreError> {
        if !self.api.session().is_signed_in() {
            debug!("No viewer, skipping task fetch.");
            return Ok(());
        }

        self.state.write().loading = true;
        self.events.publish(StoreEvent::TasksChanged);

        let result = self.api.list_tasks(filters).await;
        self.apply_fetch(result)
    }

    fn apply_fetch(&self, result: Result<Vec<Task>, ApiError>) -> Result<(), StoreError> {
        let outcome = {
            let mut state = self.state.write();
            state.loading = false;
            match result {
                Ok(tasks) => {
                    info!("Successfully retrieved {} tasks.", tasks.len());
                    state.tasks.replace_all(tasks);
                    state.error = None;
                    Ok(())
                }
                Err(err) => {
                    let store_err = StoreError::from_api(&err, "Failed to fetch tasks");
                    if store_err.is_reported() {
                        error!("Failed to fetch tasks: {}", err);
                        state.error = Some("Failed to fetch tasks".to_string());
                    } else {
                        debug!("Task fetch skipped: {}", err);
                    }
                    Err(store_err)
                }
            }
        };

        self.events.publish(StoreEvent::TasksChanged);
        if let Err(err) = &outcome {
            if err.is_reported() {
                self.events.error("Failed to fetch tasks");
            }
        }
        outcome
    }

    /// Creates a task and puts the canonical copy at the top of the list.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let draft = draft.normalized();
        debug!("Creating task '{}'", draft.title);

        let task = self
            .api
            .create_task(&draft)
            .await
            .map_err(|err| self.fail("Failed to create task", err))?;

        self.state.write().tasks.prepend(task.clone());
        info!("Task created successfully with ID: {}", task.id);
        self.changed("Task created successfully");
        Ok(task)
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, StoreError> {
        let patch = patch.normalized();
        debug!("Updating task with ID: {}", id);

        let task = self
            .api
            .update_task(id, &patch)
            .await
            .map_err(|err| self.fail("Failed to update task", err))?;

        self.state.write().tasks.replace(task.clone());
        info!("Task with ID {} updated.", id);
        self.events.publish(StoreEvent::TasksChanged);
        Ok(task)
    }

    /// Flips completion through the dedicated remote operation; the server
    /// decides the resulting state.
    pub async fn toggle_complete(&self, id: &str) -> Result<Task, StoreError> {
        debug!("Toggling completion of task with ID: {}", id);

        let (task, message) = self
            .api
            .toggle_task(id)
            .await
            .map_err(|err| self.fail("Failed to toggle task", err))?;

        self.state.write().tasks.replace(task.clone());
        info!("Task with ID {} is now complete={}.", id, task.is_complete);
        self.changed(message.unwrap_or_else(|| "Task updated".to_string()));
        Ok(task)
    }

    /// Moves a task to the trash and drops it from the cached list.
    pub async fn soft_delete(&self, id: &str) -> Result<(), StoreError> {
        debug!("Attempting to soft delete task with ID: {}", id);

        self.api
            .delete_task(id)
            .await
            .map_err(|err| self.fail("Failed to delete task", err))?;

        self.state.write().tasks.remove(id);
        info!("Task with ID {} moved to trash.", id);
        self.changed("Task moved to trash");
        Ok(())
    }

    /// Takes a task out of the trash. The canonical copy goes to the end of
    /// the list, or replaces the cached copy when one is still there.
    pub async fn restore(&self, id: &str) -> Result<Task, StoreError> {
        debug!("Restoring task with ID: {}", id);

        let task = self
            .api
            .restore_task(id)
            .await
            .map_err(|err| self.fail("Failed to restore task", err))?;

        self.state.write().tasks.upsert(task.clone());
        info!("Task with ID {} restored.", id);
        self.changed("Task restored successfully");
        Ok(task)
    }

    /// Deletes a task for good. Callers must have obtained explicit
    /// confirmation first; this cannot be undone.
    pub async fn permanent_delete(&self, id: &str) -> Result<(), StoreError> {
        debug!("Permanently deleting task with ID: {}", id);

        self.api
            .purge_task(id)
            .await
            .map_err(|err| self.fail("Failed to permanently delete task", err))?;

        self.state.write().tasks.remove(id);
        info!("Task with ID {} permanently deleted.", id);
        self.changed("Task permanently deleted");
        Ok(())
    }

    fn changed(&self, notice: impl Into<String>) {
        self.events.publish(StoreEvent::TasksChanged);
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
    use reqwest::{StatusCode, Url};

    fn store() -> TaskStore {
        let url = Url::parse("http://localhost:5000").unwrap();
        TaskStore::new(ApiClient::new(url, Arc::new(Session::new())), EventBus::new())
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
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::TasksChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_fetch_keeps_tasks_and_records_error() {
        let store = store();
        let rejected = ApiError::Rejected {
            status: StatusCode::BAD_GATEWAY,
            body: ErrorBody::default(),
        };

        let result = store.apply_fetch(Err(rejected));

        assert_eq!(
            result,
            Err(StoreError::Failed("Failed to fetch tasks".to_string()))
        );
        assert_eq!(store.last_error().as_deref(), Some("Failed to fetch tasks"));
        assert!(store.is_empty());
    }
}
