use std::{path::Path, time::Duration};

use notehub_core::DEFAULT_PER_PAGE;
use serde::{Serialize, Serializer};

use crate::{
    args::ConfigArgs, profile::Profile, query::DEFAULT_DEBOUNCE, screens::NotesSettings,
    web_client::DEFAULT_API_URL,
};

#[derive(Debug, Serialize)]
pub struct AppConfig {
    pub profile_path: String,
    pub profile_exists: bool,
    pub api_url: String,
    #[serde(serialize_with = "redact")]
    pub token: Option<String>,
    pub per_page: u32,
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            profile_path: "./".to_string(),
            profile_exists: false,
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Flags and environment win over the profile, the profile over defaults.
    pub fn from_args(args: &ConfigArgs, profile_path: &Path, profile: Option<&Profile>) -> Self {
        let defaults = AppConfig::default();

        let api_url = args
            .api_url
            .clone()
            .or_else(|| profile.and_then(|p| p.api_url.clone()))
            .unwrap_or(defaults.api_url);

        let token = args
            .token
            .clone()
            .or_else(|| profile.and_then(|p| p.token.clone()))
            .filter(|t| !t.trim().is_empty());

        AppConfig {
            profile_exists: profile.is_some(),
            profile_path: profile_path
                .to_str()
                .map(|p| p.to_string())
                .unwrap_or(defaults.profile_path),
            api_url,
            token,
            per_page: profile
                .and_then(|p| p.per_page)
                .filter(|n| *n > 0)
                .unwrap_or(defaults.per_page),
            debounce_ms: profile
                .and_then(|p| p.debounce_ms)
                .unwrap_or(defaults.debounce_ms),
        }
    }

    pub fn notes_settings(&self) -> NotesSettings {
        NotesSettings {
            per_page: self.per_page,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

fn redact<S: Serializer>(token: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Some(_) => serializer.serialize_some("********"),
        None => serializer.serialize_none(),
    }
}
