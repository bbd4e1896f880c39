use crate::error::{AppError, Result};

pub const API_URL: &str = "http://localhost:3000";

/// Menu label of the unbounded selection. Has no catalog entry.
pub const ALL_TIME_LABEL: &str = "All Time";

/// Entries rendered as podium cards; everything after goes to the list.
pub const PODIUM_SIZE: usize = 3;

/// Paging sent with every leaderboard request. `(0, 0)` lets the server
/// return the whole ranking for the window.
pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 0;

/// UI loop poll interval (milliseconds). Fetch outcomes are drained once per tick.
pub const UI_TICK_MS: u64 = 100;

/// Channel capacity for fetch outcomes routed back to the UI loop.
pub const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Bearer token forwarded as-is (API_TOKEN). Obtained elsewhere.
    pub api_token: Option<String>,
    /// Signed-in user's uuid, highlighted in the rendered lists (SELF_UUID)
    pub self_uuid: Option<String>,
    /// JSON catalog replacing the built-in academic years (CATALOG_PATH)
    pub catalog_path: Option<String>,
    pub log_level: String,
    pub log_file: String,
    pub request_timeout_secs: u64,
    /// Serve generated rankings instead of calling the API (DEMO=1)
    pub demo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: std::env::var("API_URL").unwrap_or_else(|_| API_URL.to_string()),
            api_token: non_empty_var("API_TOKEN"),
            self_uuid: non_empty_var("SELF_UUID"),
            catalog_path: non_empty_var("CATALOG_PATH"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: std::env::var("LOG_FILE").unwrap_or_else(|_| "leaderboard.log".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("REQUEST_TIMEOUT_SECS must be a whole number of seconds".to_string())
                })?,
            demo: parse_flag(&std::env::var("DEMO").unwrap_or_default())?,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        other => Err(AppError::Config(format!("DEMO must be a boolean, got {other:?}"))),
    }
}
