use std::collections::BTreeSet;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use cookie::time::Duration;

pub const COOKIE_NAME: &str = "favorites";
pub const COOKIE_MAX_AGE_DAYS: i64 = 30;
const SEPARATOR: &str = "|";

// ── FavoriteSet – per-visitor favorites, carried entirely in a cookie ─────────

/// Titles a visitor has favorited. Ordered, so encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    titles: BTreeSet<String>,
}

impl FavoriteSet {
    /// Rebuild the set from a cookie value. Entries are percent-decoded,
    /// trimmed, and empty entries dropped.
    ///
    /// Known limitation: unencoded values are decoded too, so a hand-written
    /// title containing a literal `%XX` sequence comes back rewritten.
    pub fn from_cookie(value: &str) -> Self {
        let titles = value
            .split(SEPARATOR)
            .map(|raw| {
                urlencoding::decode(raw)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| raw.to_string())
            })
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();
        Self { titles }
    }

    /// Read the `favorites` cookie from the request jar; missing means empty.
    pub fn from_jar(jar: &CookieJar) -> Self {
        jar.get(COOKIE_NAME)
            .map(|cookie| Self::from_cookie(cookie.value().trim_matches('"')))
            .unwrap_or_default()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    /// Flip membership of `title`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        if self.titles.remove(title) {
            false
        } else {
            self.titles.insert(title.to_string());
            true
        }
    }

    /// Sorted, `|`-joined, each title percent-encoded so a `|` inside a
    /// title cannot split it.
    pub fn encode(&self) -> String {
        self.titles
            .iter()
            .map(|t| urlencoding::encode(t).into_owned())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// Response cookie carrying the encoded set. The jar percent-encodes it
    /// again on the wire and decodes it on the way back in.
    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build((COOKIE_NAME, self.encode()))
            .path("/")
            .http_only(true)
            .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    }
}
