mod client;
pub mod query;

use std::time::Duration;

pub use client::error_message;
pub use query::*;
use ureq::Agent;

use crate::settings::Settings;

pub const DEFAULT_INTERPRETER_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Clone)]
pub struct OverpassClient {
    url: String,
    pub agent: Agent,
    pub user_agent: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for OverpassClient {
    fn default() -> Self {
        OverpassClient::from_settings(&Settings::default())
    }
}

impl OverpassClient {
    pub fn new(url: &str) -> Self {
        let mut client = OverpassClient::default();
        client.set_url(url);
        client
    }

    pub fn from_settings(settings: &Settings) -> Self {
        OverpassClient {
            agent: settings.agent(),
            url: settings.overpass_url.clone(),
            user_agent: settings.user_agent.clone(),
            max_attempts: settings.max_retries.max(1),
            retry_delay: Duration::from_secs(settings.retry_delay_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }
}
