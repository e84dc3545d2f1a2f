use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;

use super::error::{AppError, AppResult};
use super::types::{ApiResponse, Match};

/// Anything able to produce the raw highlight list.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn fetch(&self) -> AppResult<Vec<Match>>;
}

// ── HTTP client for the ScoreBat video API ─────────────────────────────────────

pub struct ScorebatClient {
    client: Client,
    endpoint: String,
}

impl ScorebatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::UpstreamUnreachable(format!("client init failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MatchSource for ScorebatClient {
    async fn fetch(&self) -> AppResult<Vec<Match>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnreachable(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::UpstreamUnreachable(format!(
                "ScoreBat API HTTP {}",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamUnreachable(format!("body read failed: {e}")))?;

        decode_response(&body)
    }
}

pub fn decode_response(body: &[u8]) -> AppResult<Vec<Match>> {
    serde_json::from_slice::<ApiResponse>(body)
        .map(|envelope| envelope.response)
        .map_err(|e| AppError::UpstreamMalformed(format!("JSON parse error: {e}")))
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// Fills the derived fields and sorts newest first.
///
/// Ordering compares the raw date strings, so it is only chronological for
/// fixed-width ISO-8601 input.
pub fn normalize_matches(matches: &mut [Match]) {
    for m in matches.iter_mut() {
        m.pretty_date = pretty_date(&m.date_raw);
        m.category = category_of(&m.competition);
    }

    matches.sort_by(|a, b| b.date_raw.cmp(&a.date_raw));
}

pub fn pretty_date(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// `"ENGLAND: Premier League"` -> `"england"`.
pub fn category_of(competition: &str) -> String {
    competition
        .split(':')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
