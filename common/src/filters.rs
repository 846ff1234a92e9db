// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Filter configuration for remote task queries and for local list filtering.
use crate::{ParseOptionError, Priority, Task};
use std::str::FromStr;

/// Named list views understood by the remote task query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    All,
    Today,
    Upcoming,
    Completed,
    Trash,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::All => "all",
            View::Today => "today",
            View::Upcoming => "upcoming",
            View::Completed => "completed",
            View::Trash => "trash",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::All => "All Tasks",
            View::Today => "Today's Tasks",
            View::Upcoming => "Upcoming Tasks",
            View::Completed => "Completed Tasks",
            View::Trash => "Trash",
        }
    }
}

impl FromStr for View {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(View::All),
            "today" => Ok(View::Today),
            "upcoming" => Ok(View::Upcoming),
            "completed" => Ok(View::Completed),
            "trash" => Ok(View::Trash),
            _ => Err(ParseOptionError {
                kind: "view",
                value: s.to_string(),
            }),
        }
    }
}

/// Completion-state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Incomplete,
    Complete,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Incomplete => "incomplete",
            StatusFilter::Complete => "complete",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Incomplete => !task.is_complete,
            StatusFilter::Complete => task.is_complete,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "incomplete" => Ok(StatusFilter::Incomplete),
            "complete" => Ok(StatusFilter::Complete),
            _ => Err(ParseOptionError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Priority filter: everything, or a single priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Only(priority) => priority.as_str(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == *priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        s.parse().map(PriorityFilter::Only)
    }
}

/// Options of a remote task query.
///
/// Every option is optional: an option left at `None` is not sent at all,
/// because the remote query reads the presence of a key as filter intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchFilters {
    pub view: Option<View>,
    pub project_id: Option<String>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub search: Option<String>,
}

impl FetchFilters {
    pub fn view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query-string pairs for the options holding a meaningful value.
    /// Blank text options are treated as absent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(view) = self.view {
            pairs.push(("view", view.as_str().to_string()));
        }
        if let Some(project_id) = non_blank(self.project_id.as_deref()) {
            pairs.push(("projectId", project_id.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Local, presentation-facing filter over the cached collection.
///
/// Active predicates are intersected; `All` and an empty search impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && self.priority.matches(task) && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}
