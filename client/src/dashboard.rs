// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::stats::{TaskStats, is_due_today, is_overdue};

use chrono::NaiveDate;
use common::{Project, Task};

/// How many tasks each dashboard list shows.
pub const DASHBOARD_LIST_LEN: usize = 5;

/// Summary screen data, derived from both caches.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: TaskStats,
    pub completion_rate: u32,
    /// Most recently created pending tasks, newest first.
    pub recent: Vec<Task>,
    pub overdue: Vec<Task>,
    pub due_today: Vec<Task>,
    pub project_count: usize,
}

impl Dashboard {
    pub fn build(tasks: &[Task], projects: &[Project], today: NaiveDate) -> Self {
        let stats = TaskStats::compute(tasks, today);

        let mut recent: Vec<Task> = tasks.iter().filter(|t| t.is_pending()).cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(DASHBOARD_LIST_LEN);

        let overdue = tasks
            .iter()
            .filter(|t| is_overdue(t, today))
            .take(DASHBOARD_LIST_LEN)
            .cloned()
            .collect();

        let due_today = tasks
            .iter()
            .filter(|t| is_due_today(t, today))
            .take(DASHBOARD_LIST_LEN)
            .cloned()
            .collect();

        Self {
            completion_rate: stats.completion_rate(),
            stats,
            recent,
            overdue,
            due_today,
            project_count: projects.len(),
        }
    }
}
