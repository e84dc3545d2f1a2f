use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_UPSTREAM_URL: &str = "https://www.scorebat.com/video-api/v3/";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const DEFAULT_HOME_LIMIT: usize = 6;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    pub cache_ttl: Duration,
    pub page_size: usize,
    pub home_limit: usize,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            page_size: DEFAULT_PAGE_SIZE,
            home_limit: DEFAULT_HOME_LIMIT,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Build the config from `HIGHLIGHTS_*` variables, loading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            host: text("HIGHLIGHTS_HOST", defaults.host),
            port: parse_or(&lookup, "HIGHLIGHTS_PORT", defaults.port),
            upstream_url: text("HIGHLIGHTS_UPSTREAM_URL", defaults.upstream_url),
            upstream_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HIGHLIGHTS_UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout.as_secs(),
            )),
            cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "HIGHLIGHTS_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            page_size: parse_or(&lookup, "HIGHLIGHTS_PAGE_SIZE", defaults.page_size),
            home_limit: parse_or(&lookup, "HIGHLIGHTS_HOME_LIMIT", defaults.home_limit),
            static_dir: PathBuf::from(text(
                "HIGHLIGHTS_STATIC_DIR",
                defaults.static_dir.display().to_string(),
            )),
        }
    }

    pub fn bind_addr(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().ok()
    }
}

/// Parses a positive number, falling back on missing, invalid or zero values.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, fallback: T) -> T
where
    T: FromStr + PartialEq + Default + Copy,
{
    let Some(raw) = lookup(key) else {
        return fallback;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v != T::default() => v,
        _ => {
            warn!(key, value = %raw, "ignoring invalid config value");
            fallback
        }
    }
}
