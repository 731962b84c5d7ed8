//! Command-line / environment options shared by the CLI and the server.

use std::time::Duration;

use clap::Args;
use common::search::{DEFAULT_COUNTRY, DEFAULT_HOURS_OLD};
use common::{ScrapeError, SearchSettings, Site};
use reqwest::blocking::Client;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client options.
#[derive(Args, Debug, Clone)]
pub struct HttpOpts {
    /// Timeout of a single request to a job board, in seconds
    #[arg(long, env, default_value_t = 30)]
    pub timeout_secs: u64,

    /// User agent sent to the job boards
    #[arg(long, env, default_value_t = String::from(DEFAULT_USER_AGENT))]
    pub user_agent: String,
}

impl Default for HttpOpts {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpOpts {
    pub fn build_client(&self) -> Result<Client, ScrapeError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Network(format!("failed to create HTTP client: {e}")))
    }
}

/// Options fixed for every pair of a run.
#[derive(Args, Debug, Clone)]
pub struct SearchOpts {
    /// Job boards to search
    #[arg(long, env, value_delimiter = ',', default_values_t = Site::ALL)]
    pub sites: Vec<Site>,

    /// Only postings newer than this many hours
    #[arg(long, env, default_value_t = DEFAULT_HOURS_OLD)]
    pub hours_old: u32,

    /// Country used for Indeed searches
    #[arg(long, env, default_value_t = String::from(DEFAULT_COUNTRY))]
    pub country: String,

    /// Skip fetching full posting pages for descriptions
    #[arg(long, env)]
    pub no_description: bool,
}

impl From<&SearchOpts> for SearchSettings {
    fn from(opts: &SearchOpts) -> Self {
        SearchSettings {
            sites: opts.sites.clone(),
            hours_old: opts.hours_old,
            fetch_description: !opts.no_description,
            country: opts.country.clone(),
        }
    }
}
