// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// One field-level complaint from the remote validator.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldError {
    #[serde(default)]
    pub msg: String,
    #[serde(default, alias = "path")]
    pub param: Option<String>,
}

/// Body of a rejected request. Every part is optional; the remote side
/// sends `errors` for validation failures and `message`/`error` otherwise.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<FieldError>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// First non-empty field-level validation message.
    pub fn field_message(&self) -> Option<&str> {
        self.errors
            .iter()
            .map(|e| e.msg.trim())
            .find(|msg| !msg.is_empty())
    }

    /// General message attached to the rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field_message().or(self.server_message()) {
            Some(msg) => f.write_str(msg),
            None => f.write_str("no details"),
        }
    }
}

/// Failure of a single call against the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no viewer is signed in")]
    NoViewer,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote service answered {status}: {body}")]
    Rejected { status: StatusCode, body: ErrorBody },

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result handed back to the callers of a store operation.
///
/// Stores never propagate an [`ApiError`] as-is: they translate it into the
/// message the user gets to see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The operation was skipped because nobody is signed in. Not reported.
    #[error("no viewer is signed in")]
    NoViewer,

    /// The remote side rejected the payload.
    #[error("{0}")]
    Validation(String),

    /// Transport, availability, or any other remote failure.
    #[error("{0}")]
    Failed(String),
}

impl StoreError {
    /// Translates a remote failure, using `fallback` when the remote side
    /// gave nothing better.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::NoViewer => StoreError::NoViewer,
            ApiError::Rejected { body, .. } => {
                if let Some(msg) = body.field_message() {
                    StoreError::Validation(msg.to_string())
                } else {
                    StoreError::Failed(body.server_message().unwrap_or(fallback).to_string())
                }
            }
            ApiError::Transport(_) | ApiError::Decode(_) => StoreError::Failed(fallback.to_string()),
        }
    }

    /// Whether the failure should reach the user as a notice.
    pub fn is_reported(&self) -> bool {
        !matches!(self, StoreError::NoViewer)
    }
}
