use crate::error::{Result, WallieError};
use crate::size::PointScheme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SESSION_NAME: &str = "JSESSIONID";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Paths served by fixed routes; the login page cannot take one of them.
pub const RESERVED_PATHS: &[&str] = &[
    "/",
    "/estimation",
    "/tshirt",
    "/sizing",
    "/cfd",
    "/flow",
    "/favicon.ico",
];

/// Prefix of the embedded static assets.
pub const STATIC_PREFIX: &str = "/static";

/// Process-wide settings, read once at startup.
///
/// The JSON keys keep their historical PascalCase spelling so existing
/// `config.json` files continue to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub jira_base: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_session_name")]
    pub session_name: String,
    /// Drop the `Secure` attribute from cookies (local development over http).
    #[serde(default)]
    pub is_insecure: bool,
    #[serde(default)]
    pub point_scheme: PointScheme,
    #[serde(skip)]
    pub always_reload_html: bool,
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_session_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_base: String::new(),
            login_path: default_login_path(),
            session_name: default_session_name(),
            is_insecure: false,
            point_scheme: PointScheme::default(),
            always_reload_html: false,
        }
    }
}

impl Config {
    pub fn new(jira_base: impl Into<String>) -> Self {
        let mut config = Self {
            jira_base: jira_base.into(),
            ..Self::default()
        };
        config.normalize();
        config
    }

    /// Load `path`, then apply the `jira_base` override.
    ///
    /// A missing or unreadable file is tolerated only when an override is
    /// given; malformed JSON is always an error.
    pub fn load(path: &Path, jira_base: Option<&str>) -> Result<Self> {
        let jira_base = jira_base.filter(|b| !b.trim().is_empty());

        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Config>(&raw)
                .map_err(|e| WallieError::Config(format!("{}: {e}", path.display())))?,
            Err(e) if jira_base.is_some() => {
                tracing::warn!(path = %path.display(), error = %e, "config not readable, using defaults");
                Config::default()
            }
            Err(e) => {
                return Err(WallieError::Config(format!(
                    "unable to read {}: {e}",
                    path.display()
                )))
            }
        };

        if let Some(base) = jira_base {
            config.jira_base = base.to_string();
        }

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        self.jira_base = self.jira_base.trim().trim_end_matches('/').to_string();
        if self.session_name.trim().is_empty() {
            self.session_name = default_session_name();
        }
        if self.login_path.trim().is_empty() {
            self.login_path = default_login_path();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jira_base.is_empty() {
            return Err(WallieError::Config("JiraBase is not set".into()));
        }
        if !self.login_path.starts_with('/') {
            return Err(WallieError::Config(format!(
                "LoginPath '{}' must start with '/'",
                self.login_path
            )));
        }
        if self.login_path.contains(['{', '}', '*']) {
            return Err(WallieError::Config(format!(
                "LoginPath '{}' must be a plain path",
                self.login_path
            )));
        }
        let under_static = self.login_path == STATIC_PREFIX
            || self.login_path.starts_with(&format!("{STATIC_PREFIX}/"));
        if RESERVED_PATHS.contains(&self.login_path.as_str()) || under_static {
            return Err(WallieError::Config(format!(
                "LoginPath '{}' is already taken by another route",
                self.login_path
            )));
        }
        Ok(())
    }
}
