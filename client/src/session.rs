// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use parking_lot::RwLock;
use std::fmt;

/// The signed-in user and the bearer credential of their session.
#[derive(Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub token: String,
}

impl Viewer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            token: token.into(),
        }
    }
}

// The token must never end up in logs.
impl fmt::Debug for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Current-viewer gate shared by every store. While it holds no viewer, no
/// store talks to the remote service.
#[derive(Debug, Default)]
pub struct Session {
    viewer: RwLock<Option<Viewer>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewer(viewer: Viewer) -> Self {
        Self {
            viewer: RwLock::new(Some(viewer)),
        }
    }

    pub fn sign_in(&self, viewer: Viewer) {
        tracing::info!("Viewer {} signed in.", viewer.id);
        *self.viewer.write() = Some(viewer);
    }

    pub fn sign_out(&self) {
        if let Some(viewer) = self.viewer.write().take() {
            tracing::info!("Viewer {} signed out.", viewer.id);
        }
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.viewer.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.viewer.read().is_some()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.viewer.read().as_ref().map(|v| v.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let session = Session::new();
        assert!(!session.is_signed_in());
        assert_eq!(session.bearer_token(), None);

        session.sign_in(Viewer::new("u1", "Ada", "secret"));
        assert!(session.is_signed_in());
        assert_eq!(session.bearer_token().as_deref(), Some("secret"));

        session.sign_out();
        assert!(session.viewer().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let viewer = Viewer::new("u1", "Ada", "secret");
        let printed = format!("{viewer:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
