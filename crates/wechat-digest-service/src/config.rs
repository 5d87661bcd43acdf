use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::auth::Secret;
use crate::scrape::fetcher::DEFAULT_SEARCH_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// SQLite database path
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind_address: String,

    /// Bearer token required by the ingestion trigger; the trigger is open when unset
    #[arg(long, env = "CRON_SECRET")]
    pub cron_secret: Option<String>,

    /// Bearer token required by admin writes; admin writes are disabled when unset
    #[arg(long, env = "ADMIN_PASSWORD")]
    pub admin_password: Option<String>,

    /// Pause between two consecutive search requests, in milliseconds
    #[arg(long, env = "FETCH_DELAY_MS", default_value_t = 2000)]
    pub fetch_delay_ms: u64,

    /// Timeout of a single search request, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Timeout of an incoming HTTP request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 300)]
    pub request_timeout_secs: u64,

    /// Search listing endpoint
    #[arg(long, env = "SEARCH_BASE_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_base_url: String,

    /// Seed the default keywords when the keyword table is empty
    #[arg(long, env = "SEED_DEFAULT_KEYWORDS", default_value_t = true, action = ArgAction::Set)]
    pub seed_default_keywords: bool,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            cron_secret: non_empty_secret(self.cron_secret.as_deref()),
            admin_password: non_empty_secret(self.admin_password.as_deref()),
            fetch_delay: Duration::from_millis(self.fetch_delay_ms),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// An empty variable counts as unset.
fn non_empty_secret(value: Option<&str>) -> Option<Secret> {
    value.filter(|v| !v.is_empty()).map(Secret::new)
}

/// Runtime settings injected into the application state.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cron_secret: Option<Secret>,
    pub admin_password: Option<Secret>,
    pub fetch_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cron_secret: None,
            admin_password: None,
            fetch_delay: Duration::from_secs(2),
        }
    }
}
