//! Layered settings
//!
//! Defaults, then an optional TOML file, then environment variables. Command
//! line flags are applied last by the caller.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

pub const ENV_API_URL: &str = "MAILCHIMP_API_URL";
pub const ENV_USERNAME: &str = "MAILCHIMP_USERNAME";
pub const ENV_API_KEY: &str = "MAILCHIMP_API_KEY";
pub const ENV_LIST: &str = "ROSTER_SYNC_LIST";
pub const ENV_SHEET: &str = "ROSTER_SYNC_SHEET";

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Data-center base URL of the Marketing API
    pub api_url: String,
    /// Basic-auth user; Mailchimp ignores its value
    pub username: String,
    pub api_key: Option<String>,
    /// Audience the roster is synced into
    pub list_name: String,
    /// Worksheet holding the roster
    pub sheet_name: String,
    /// `count` sent with every GET
    pub page_size: u32,
    /// Interest categories cached at startup
    pub interest_categories: Vec<String>,
    /// Category whose interests are the ranks
    pub rank_category: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://us12.api.mailchimp.com/3.0/".to_string(),
            username: "anystring".to_string(),
            api_key: None,
            list_name: "Indian Prairie District Adults".to_string(),
            sheet_name: "IP Adults".to_string(),
            page_size: 200,
            interest_categories: vec!["Interests".to_string(), "Positions".to_string()],
            rank_category: "Positions".to_string(),
        }
    }
}

// Keep the key out of debug logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("list_name", &self.list_name)
            .field("sheet_name", &self.sheet_name)
            .field("page_size", &self.page_size)
            .field("interest_categories", &self.interest_categories)
            .field("rank_category", &self.rank_category)
            .finish()
    }
}

impl Config {
    /// `<config dir>/roster-sync/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("roster-sync").join("config.toml"))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Build the file and environment layers.
    ///
    /// An explicit `path` must exist; the default path is used only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => {
                    debug!("Loading config from {}", default.display());
                    Self::from_file(&default)?
                }
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values found by `lookup`; blank values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(user) = get(ENV_USERNAME) {
            self.username = user;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(list) = get(ENV_LIST) {
            self.list_name = list;
        }
        if let Some(sheet) = get(ENV_SHEET) {
            self.sheet_name = sheet;
        }
    }

    /// The API key, or an error naming where to set it
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!(
                "No Mailchimp API key configured. Set {} or add api_key to the config file",
                ENV_API_KEY
            ),
        }
    }
}
