use serde::{Deserialize, Serialize};

// ── Upstream types ─────────────────────────────────────────────────────────────

/// Envelope returned by the video API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub response: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchVideo {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "embed", default)]
    pub embed_html: String,
}

/// One highlight entry. `title` doubles as the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "competition", default)]
    pub competition: String,
    #[serde(rename = "matchviewUrl", default)]
    pub matchview_url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(rename = "date", default)]
    pub date_raw: String,
    #[serde(default)]
    pub videos: Vec<MatchVideo>,

    // Derived by the normalizer, never read from the provider.
    #[serde(rename = "prettyDate", skip_deserializing)]
    pub pretty_date: String,
    #[serde(skip_deserializing)]
    pub category: String,
    #[serde(rename = "isFavorite", skip_deserializing)]
    pub is_favorite: bool,
}

// ── View models handed to the renderer ─────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPageData {
    pub title: String,
    pub matches: Vec<Match>,
    pub query: String,
    pub category: String,
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "currentPage")]
    pub current_page: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "prevPage")]
    pub prev_page: usize,
    #[serde(rename = "nextPage")]
    pub next_page: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailPageData {
    #[serde(flatten)]
    pub record: Match,
    /// Trusted provider markup, passed through verbatim.
    #[serde(rename = "embedHtml")]
    pub embed_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutPageData {
    pub title: String,
}
