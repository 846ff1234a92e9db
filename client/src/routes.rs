// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

/// Endpoints of the remote task service.
///
/// | Route            | Used with                                    |
/// |------------------|----------------------------------------------|
/// | `Tasks`          | `GET` list, `POST` create                    |
/// | `Task`           | `PUT` update, `DELETE` soft delete           |
/// | `ToggleTask`     | `PATCH` flip completion                      |
/// | `RestoreTask`    | `PATCH` take out of the trash                |
/// | `PermanentTask`  | `DELETE` remove for good                     |
/// | `Projects`       | `GET` list, `POST` create                    |
/// | `Project`        | `PUT` update, `DELETE` delete                |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Tasks,
    Task(&'a str),
    ToggleTask(&'a str),
    RestoreTask(&'a str),
    PermanentTask(&'a str),
    Projects,
    Project(&'a str),
}

impl<'a> Route<'a> {
    /// Path segments below the service root. Ids are single segments and get
    /// percent-encoded when joined onto the base URL.
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Route::Tasks => vec!["api", "tasks"],
            Route::Task(id) => vec!["api", "tasks", id],
            Route::ToggleTask(id) => vec!["api", "tasks", id, "toggle"],
            Route::RestoreTask(id) => vec!["api", "tasks", id, "restore"],
            Route::PermanentTask(id) => vec!["api", "tasks", id, "permanent"],
            Route::Projects => vec!["api", "projects"],
            Route::Project(id) => vec!["api", "projects", id],
        }
    }
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
