use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::RankingSource;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{FetchQuery, RankedUser};

/// Body of `GET /api/v1/leaderboard`.
#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    leaderboard: Vec<RankedUser>,
}

pub struct HttpRankingSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRankingSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            token: cfg.api_token.clone(),
        })
    }
}

impl RankingSource for HttpRankingSource {
    async fn fetch(&self, query: FetchQuery) -> Result<Vec<RankedUser>> {
        let url = format!("{}/api/v1/leaderboard", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("offset", i64::from(query.offset)),
            ("limit", i64::from(query.limit)),
            ("from", query.window.start_unix),
            ("to", query.window.end_unix),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%status, bytes = body.len(), window = %query.window, "Leaderboard response");
        decode_response(status, &body)
    }
}

/// Turn a response into users or a rejection. The API reports failures in an
/// `error` field; that message wins over a bare status line when present.
fn decode_response(status: StatusCode, body: &str) -> Result<Vec<RankedUser>> {
    let parsed = serde_json::from_str::<LeaderboardResponse>(body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| format!("Leaderboard request failed: {status}"));
        return Err(AppError::Fetch(message));
    }

    let response = parsed?;
    match response.error {
        Some(message) => Err(AppError::Fetch(message)),
        None => Ok(response.leaderboard),
    }
}
