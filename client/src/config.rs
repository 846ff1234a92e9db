// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::session::{Session, Viewer};

use anyhow::{Context, Result, bail};
use reqwest::Url;

// Where the remote service listens unless told otherwise.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub const API_URL_VAR: &str = "TASKDECK_API_URL";
pub const TOKEN_VAR: &str = "TASKDECK_TOKEN";
pub const VIEWER_VAR: &str = "TASKDECK_VIEWER";

/// Client settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub token: Option<String>,
    pub viewer_name: String,
}

impl Config {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            token: token.filter(|t| !t.trim().is_empty()),
            viewer_name: "me".to_string(),
        })
    }

    /// Reads `TASKDECK_API_URL`, `TASKDECK_TOKEN` and `TASKDECK_VIEWER`.
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&api_url, std::env::var(TOKEN_VAR).ok())
            .with_context(|| format!("Invalid {API_URL_VAR}"))?;
        if let Ok(name) = std::env::var(VIEWER_VAR) {
            if !name.trim().is_empty() {
                config.viewer_name = name;
            }
        }
        Ok(config)
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, api_url: Option<&str>, token: Option<String>) -> Result<Self> {
        if let Some(api_url) = api_url {
            self.api_url = parse_api_url(api_url)?;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        Ok(self)
    }

    /// Session for these settings; without a token nobody is signed in.
    pub fn session(&self) -> Session {
        match &self.token {
            Some(token) => Session::with_viewer(Viewer::new(
                self.viewer_name.clone(),
                self.viewer_name.clone(),
                token.clone(),
            )),
            None => Session::new(),
        }
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Failed to parse API URL '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API URL must use http or https, got '{}'", url.scheme());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_url() {
        assert!(Config::new("http://localhost:5000", None).is_ok());
        assert!(Config::new("not a url", None).is_err());
        assert!(Config::new("ftp://example.com", None).is_err());
    }

    #[test]
    fn test_blank_token_means_no_viewer() {
        let config = Config::new(DEFAULT_API_URL, Some("  ".to_string())).unwrap();
        assert_eq!(config.token, None);
        assert!(!config.session().is_signed_in());
    }

    #[test]
    fn test_token_signs_viewer_in() {
        let config = Config::new(DEFAULT_API_URL, Some("secret".to_string())).unwrap();
        let session = config.session();
        assert_eq!(session.bearer_token().as_deref(), Some("secret"));
        assert_eq!(session.viewer().unwrap().name, "me");
    }

    #[test]
    fn test_overrides() {
        let config = Config::new(DEFAULT_API_URL, None)
            .unwrap()
            .with_overrides(Some("https://tasks.example.com"), Some("t".to_string()))
            .unwrap();
        assert_eq!(config.api_url.as_str(), "https://tasks.example.com/");
        assert_eq!(config.token.as_deref(), Some("t"));
    }
}
