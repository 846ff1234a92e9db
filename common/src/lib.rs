// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod colors;
pub mod due_date;
pub mod filters;

pub use filters::{FetchFilters, PriorityFilter, StatusFilter, TaskFilter, View};

/// Anything the client caches by an opaque, server-assigned id.
pub trait Entity {
    fn id(&self) -> &str;
}

/// Priority of a task. The wire format is the upper-case name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual option does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

impl FromStr for Priority {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            _ => Err(ParseOptionError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

#[allow(clippy::doc_overindented_list_items)]
/// Represents a task as the remote service returns it.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from the camelCase JSON
///    exchanged with the remote service.
/// - `Debug`, `Clone`, `PartialEq`: The cache hands out copies and tests
///    compare whole entities.
///
/// A `Task` is always the canonical copy acknowledged by the server; the
/// client never builds one from its own request payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    // Only the calendar day matters; timestamps sent by the server are
    // folded onto the local day.
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub is_complete: bool,

    #[serde(default)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Denormalized snapshot of the owning project, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

impl Task {
    /// Neither complete nor in the trash.
    pub fn is_pending(&self) -> bool {
        !self.is_complete && !self.is_deleted
    }

    pub fn has_project(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Display copy of a project embedded in a task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "colors::default_color")]
    pub color: String,
}

/// Structure used to send task creation data to the API.
///
/// `project_id` is skipped entirely when it holds no reference: the remote
/// side reads an explicit `null` as "clear the project", not "no project".
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Drops a blank project reference so it is never sent.
    pub fn normalized(mut self) -> Self {
        self.project_id = self.project_id.filter(|id| !id.trim().is_empty());
        self
    }
}

/// Partial update of a task.
///
/// An outer `None` leaves the field untouched on the server. For the
/// clearable fields, `Some(None)` is sent as an explicit `null`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "due_date::serialize_patch"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Option<String>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn due(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn project(mut self, project_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A blank project reference means "move to no project".
    pub fn normalized(mut self) -> Self {
        if let Some(project_id) = self.project_id.take() {
            self.project_id = Some(project_id.filter(|id| !id.trim().is_empty()));
        }
        self
    }
}

/// Aggregate the remote side may attach to a project (`_count`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectCount {
    #[serde(default)]
    pub tasks: usize,
}

/// Represents a project and its display color.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default = "colors::default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ProjectCount>,
}

impl Project {
    /// Task count as reported by the server, 0 when it sent none.
    pub fn reported_task_count(&self) -> usize {
        self.count.map(|c| c.tasks).unwrap_or(0)
    }
}

impl Entity for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub color: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: colors::default_color(),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ProjectPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
