// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Client-side synchronization layer of the task manager: caches the
//! viewer's tasks and projects, keeps them in line with the remote service,
//! and derives everything the views display from those caches.
pub mod api;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod projects;
pub mod routes;
pub mod session;
pub mod stats;
pub mod tasks;

pub use api::ApiClient;
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{ApiError, StoreError};
pub use events::{EventBus, Notice, NoticeLevel, StoreEvent};
pub use projects::{ProjectStore, ProjectSummary, ProjectTaskCount, TaskGroup};
pub use session::{Session, Viewer};
pub use stats::{DueBucket, TaskStats};
pub use tasks::TaskStore;

use chrono::Local;
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Both stores wired to one session, one API client and one event bus.
#[derive(Debug, Clone)]
pub struct App {
    pub session: Arc<Session>,
    pub tasks: TaskStore,
    pub projects: ProjectStore,
    events: EventBus,
}

impl App {
    pub fn new(base_url: Url, session: Arc<Session>) -> Self {
        let api = ApiClient::new(base_url, session.clone());
        let events = EventBus::new();
        Self {
            session,
            tasks: TaskStore::new(api.clone(), events.clone()),
            projects: ProjectStore::new(api, events.clone()),
            events,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), Arc::new(config.session()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Dashboard over the current caches, for the current local day.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(
            &self.tasks.tasks(),
            &self.projects.projects(),
            Local::now().date_naive(),
        )
    }
}
