use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use crate::apis::nominatim::DEFAULT_SEARCH_URL;
use crate::error::{QueryError, Result};
use crate::overpass::DEFAULT_INTERPRETER_URL;
use crate::types::{DEFAULT_AREA, DEFAULT_QUERY_TIMEOUT};

pub const SETTINGS_FILE: &str = "settings.json";

/// Endpoints, timeouts and defaults for an export run.
///
/// Every field may be left out of the JSON file, in which case the default applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub overpass_url: String,
    pub nominatim_url: String,
    pub user_agent: String,
    /// Whole-request timeout for the HTTP agent. Keep it above `query_timeout_secs`.
    pub http_timeout_secs: u64,
    /// Value of the `[timeout:N]` directive sent to Overpass.
    pub query_timeout_secs: u32,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub area: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            overpass_url: DEFAULT_INTERPRETER_URL.to_string(),
            nominatim_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: format!("access-map/{}", env!("CARGO_PKG_VERSION")),
            http_timeout_secs: 60,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT,
            max_retries: 3,
            retry_delay_secs: 5,
            area: DEFAULT_AREA.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the platform config directory when no path is given.
    ///
    /// An explicit path must exist. A missing file in the config directory just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Settings::from_file(path),
            None => match default_settings_path() {
                Some(path) if path.exists() => Settings::from_file(&path),
                _ => {
                    debug!("No settings file found, using defaults");
                    Ok(Settings::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            QueryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings: Settings = serde_json::from_str(&text)?;
        debug!("Loaded settings from {}", path.display());
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overpass_url.trim().is_empty() {
            return Err(QueryError::Config("overpass_url is empty".into()));
        }
        if self.nominatim_url.trim().is_empty() {
            return Err(QueryError::Config("nominatim_url is empty".into()));
        }
        if self.query_timeout_secs == 0 {
            return Err(QueryError::Config("query_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// HTTP agent shared by the geocoder and the interpreter client.
    ///
    /// Status codes are not turned into errors so Overpass error pages can be read.
    pub fn agent(&self) -> Agent {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(self.http_timeout_secs)))
            .http_status_as_error(false)
            .build();
        config.into()
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "openstreetmap", "access-map")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}
