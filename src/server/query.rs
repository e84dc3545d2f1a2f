use super::config::DEFAULT_PAGE_SIZE;
use super::error::{AppError, AppResult};
use super::favorites::FavoriteSet;
use super::types::Match;

/// Free-text and category filters. Empty strings disable a filter.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub text: String,
    pub category: String,
}

impl MatchFilter {
    pub fn new(text: &str, category: &str) -> Self {
        Self {
            text: text.trim().to_lowercase(),
            category: category.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category.is_empty()
    }

    pub fn matches(&self, m: &Match) -> bool {
        if !self.text.is_empty()
            && !m.title.to_lowercase().contains(&self.text)
            && !m.competition.to_lowercase().contains(&self.text)
        {
            return false;
        }
        if !self.category.is_empty() && !m.category.to_lowercase().contains(&self.category) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPage {
    pub items: Vec<Match>,
    pub current_page: usize,
    pub total_pages: usize,
    /// 0 when already on the first page.
    pub prev_page: usize,
    /// 0 when already on the last page.
    pub next_page: usize,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Filter, paginate, then flag favorites on the resulting page.
pub fn query(
    records: Vec<Match>,
    filter: &MatchFilter,
    page: usize,
    page_size: usize,
    favorites: &FavoriteSet,
) -> MatchPage {
    let filtered = filter_matches(records, filter);
    let mut page = paginate(filtered, page, page_size);
    annotate_favorites(&mut page.items, favorites);
    page
}

pub fn filter_matches(records: Vec<Match>, filter: &MatchFilter) -> Vec<Match> {
    if filter.is_empty() {
        return records;
    }
    records.into_iter().filter(|m| filter.matches(m)).collect()
}

pub fn paginate(records: Vec<Match>, page: usize, page_size: usize) -> MatchPage {
    let size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    let total_pages = records.len().div_ceil(size).max(1);
    let current_page = page.clamp(1, total_pages);

    let start = ((current_page - 1) * size).min(records.len());
    let end = (start + size).min(records.len());
    let items = records.into_iter().skip(start).take(end - start).collect();

    MatchPage {
        items,
        current_page,
        total_pages,
        prev_page: if current_page > 1 { current_page - 1 } else { 0 },
        next_page: if current_page < total_pages { current_page + 1 } else { 0 },
    }
}

pub fn annotate_favorites(records: &mut [Match], favorites: &FavoriteSet) {
    for m in records.iter_mut() {
        m.is_favorite = favorites.contains(&m.title);
    }
}

/// Exact title first, then a case-folded, whitespace-collapsed comparison.
/// The first record wins on duplicates.
pub fn find_by_title<'a>(records: &'a [Match], title: &str) -> AppResult<&'a Match> {
    if let Some(found) = records.iter().find(|m| m.title == title) {
        return Ok(found);
    }

    let wanted = fold_title(title);
    records
        .iter()
        .find(|m| fold_title(&m.title) == wanted)
        .ok_or_else(|| AppError::NotFound(title.to_string()))
}

fn fold_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parses a `page` query value; anything unusable means page 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::scorebat::normalize_matches;

    fn record(title: &str, competition: &str, date: &str) -> Match {
        Match {
            title: title.to_string(),
            competition: competition.to_string(),
            matchview_url: String::new(),
            thumbnail: String::new(),
            date_raw: date.to_string(),
            videos: vec![],
            pretty_date: String::new(),
            category: String::new(),
            is_favorite: false,
        }
    }

    fn catalogue() -> Vec<Match> {
        let mut records = vec![
            record("Arsenal - Chelsea", "ENGLAND: Premier League", "2024-01-05T00:00:00Z"),
            record("Real Madrid - Barcelona", "SPAIN: La Liga", "2024-01-04T00:00:00Z"),
            record("Chelsea - Porto", "CHAMPIONS LEAGUE: Group A", "2024-01-03T00:00:00Z"),
            record("Liverpool - Everton", "ENGLAND: FA Cup", "2024-01-02T00:00:00Z"),
            record("Untitled friendly", "", "2024-01-01T00:00:00Z"),
        ];
        normalize_matches(&mut records);
        records
    }

    fn titles(records: &[Match]) -> Vec<&str> {
        records.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn empty_filter_passes_everything_through() {
        let all = catalogue();
        let out = filter_matches(all.clone(), &MatchFilter::new("", "  "));
        assert_eq!(out, all);
    }

    #[test]
    fn text_filter_checks_title_and_competition() {
        let out = filter_matches(catalogue(), &MatchFilter::new("CHELSEA", ""));
        assert_eq!(titles(&out), ["Arsenal - Chelsea", "Chelsea - Porto"]);

        let out = filter_matches(catalogue(), &MatchFilter::new("la liga", ""));
        assert_eq!(titles(&out), ["Real Madrid - Barcelona"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let out = filter_matches(catalogue(), &MatchFilter::new("chelsea", "England"));
        assert_eq!(titles(&out), ["Arsenal - Chelsea"]);

        let out = filter_matches(catalogue(), &MatchFilter::new("", "eng"));
        assert_eq!(titles(&out), ["Arsenal - Chelsea", "Liverpool - Everton"]);

        let out = filter_matches(catalogue(), &MatchFilter::new("porto", "spain"));
        assert!(out.is_empty());
    }

    #[test]
    fn total_pages_is_never_zero() {
        for count in 0..30usize {
            for size in 1..8usize {
                let records = vec![record("x", "", ""); count];
                let page = paginate(records, 1, size);
                assert_eq!(page.total_pages, count.div_ceil(size).max(1));
            }
        }
    }

    #[test]
    fn page_numbers_are_clamped() {
        let page = paginate(catalogue(), 99, 2);
        assert_eq!(page.current_page, 3);
        assert_eq!(titles(&page.items), ["Untitled friendly"]);
        assert_eq!((page.prev_page, page.next_page), (2, 0));

        let page = paginate(catalogue(), 0, 2);
        assert_eq!(page.current_page, 1);
        assert_eq!((page.prev_page, page.next_page), (0, 2));

        let page = paginate(vec![], 4, 9);
        assert_eq!((page.current_page, page.total_pages), (1, 1));
        assert!(page.items.is_empty());
        assert_eq!((page.prev_page, page.next_page), (0, 0));
    }

    #[test]
    fn zero_page_size_uses_default() {
        let records = vec![record("x", "", ""); 10];
        let page = paginate(records, 1, 0);
        assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn scenario_three_records_two_per_page() {
        let mut records = vec![
            record("03", "", "2024-01-03T12:00:00Z"),
            record("01", "", "2024-01-01T12:00:00Z"),
            record("02", "", "2024-01-02T12:00:00Z"),
        ];
        normalize_matches(&mut records);

        let page = query(records, &MatchFilter::default(), 1, 2, &FavoriteSet::default());
        assert_eq!(titles(&page.items), ["03", "02"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.prev_page, 0);
        assert_eq!(page.next_page, 2);
    }

    #[test]
    fn favorites_are_flagged_on_the_page() {
        let favorites = FavoriteSet::from_cookie("Chelsea - Porto|Not in catalogue");
        let page = query(catalogue(), &MatchFilter::default(), 1, 9, &favorites);
        let flagged: Vec<_> = page
            .items
            .iter()
            .filter(|m| m.is_favorite)
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(flagged, ["Chelsea - Porto"]);
    }

    #[test]
    fn lookup_prefers_exact_then_folds() {
        let mut records = catalogue();
        records.push(record("team a vs team b", "", ""));

        let found = find_by_title(&records, "Real Madrid - Barcelona").unwrap();
        assert_eq!(found.competition, "SPAIN: La Liga");

        let found = find_by_title(&records, "Team A  vs Team B").unwrap();
        assert_eq!(found.title, "team a vs team b");

        let found = find_by_title(&records, " ARSENAL -\tCHELSEA ").unwrap();
        assert_eq!(found.title, "Arsenal - Chelsea");

        assert_eq!(
            find_by_title(&records, "Nobody - Nowhere"),
            Err(AppError::NotFound("Nobody - Nowhere".into()))
        );
    }

    #[test]
    fn lookup_returns_first_duplicate() {
        let records = vec![
            record("Derby", "ENGLAND: A", ""),
            record("Derby", "ENGLAND: B", ""),
        ];
        assert_eq!(find_by_title(&records, "Derby").unwrap().competition, "ENGLAND: A");
    }

    #[test]
    fn parse_page_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("3")), 3);
    }
}
