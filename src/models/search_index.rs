use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32String};

use super::clip::{ClipContent, ClipEntry, ClipKind};

/// Search case sensitivity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Smart case: case-insensitive unless query contains uppercase letters
    #[default]
    SmartCase,
    CaseSensitive,
}

/// Restricts visible entries to one kind of content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(ClipKind),
}

impl KindFilter {
    /// Cycle All -> Text -> Image -> Files -> All
    pub fn next(self) -> Self {
        match self {
            KindFilter::All => KindFilter::Only(ClipKind::Text),
            KindFilter::Only(ClipKind::Text) => KindFilter::Only(ClipKind::Image),
            KindFilter::Only(ClipKind::Image) => KindFilter::Only(ClipKind::Files),
            KindFilter::Only(ClipKind::Files) => KindFilter::All,
        }
    }

    pub fn matches(&self, entry: &ClipEntry) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(kind) => entry.kind() == *kind,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Only(ClipKind::Text) => "text",
            KindFilter::Only(ClipKind::Image) => "images",
            KindFilter::Only(ClipKind::Files) => "files",
        }
    }
}

/// Wrapper around nucleo for fuzzy searching clipboard entries
pub struct SearchIndex {
    matcher: Matcher,
    mode: SearchMode,
}

impl SearchIndex {
    pub fn new() -> Self {
        SearchIndex {
            matcher: Matcher::new(Config::DEFAULT),
            mode: SearchMode::default(),
        }
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            SearchMode::SmartCase => SearchMode::CaseSensitive,
            SearchMode::CaseSensitive => SearchMode::SmartCase,
        };
    }

    /// Search clips by query string
    /// Returns (clip_id, score) pairs, best match first.
    /// An empty query returns every clip in history order.
    pub fn search(&mut self, clips: &[ClipEntry], query: &str) -> Vec<(u64, u32)> {
        if query.is_empty() {
            return clips.iter().map(|c| (c.id, u32::MAX)).collect();
        }

        let case_matching = match self.mode {
            SearchMode::SmartCase => CaseMatching::Smart,
            SearchMode::CaseSensitive => CaseMatching::Respect,
        };
        let pattern = Pattern::parse(query, case_matching, Normalization::Smart);

        let mut results: Vec<(u64, u32)> = clips
            .iter()
            .filter_map(|clip| {
                let haystack = Utf32String::from(searchable_text(clip).as_str());
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (clip.id, score))
            })
            .collect();

        // Stable sort keeps history order among equal scores
        results.sort_by(|a, b| b.1.cmp(&a.1));

        results
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Text the fuzzy matcher runs against for a clip
fn searchable_text(clip: &ClipEntry) -> String {
    match &clip.content {
        ClipContent::Text(t) => t.clone(),
        ClipContent::Image { mime_type, .. } => format!("[image] {}", mime_type),
        ClipContent::Files(paths) => {
            let mut text = String::from("[files]");
            for path in paths {
                text.push(' ');
                text.push_str(&path.to_string_lossy());
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn clips(texts: &[&str]) -> Vec<ClipEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ClipEntry::new(i as u64 + 1, ClipContent::Text(t.to_string())))
            .collect()
    }

    #[test]
    fn test_search_empty_query() {
        let mut index = SearchIndex::new();
        let clips = clips(&["hello world", "goodbye world"]);

        let results = index.search(&clips, "");
        assert_eq!(results.iter().map(|r| r.0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_search_basic() {
        let mut index = SearchIndex::new();
        let clips = clips(&["goodbye world", "hello world", "unrelated"]);

        let results = index.search(&clips, "hello");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 2);
    }

    #[test]
    fn test_search_ranks_better_match_first() {
        let mut index = SearchIndex::new();
        let clips = clips(&["c_o_n_f_i_g scattered", "config.toml"]);

        let results = index.search(&clips, "config");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 2);
    }

    #[test]
    fn test_search_smart_case() {
        let mut index = SearchIndex::new();
        let clips = clips(&["Hello World"]);

        assert_eq!(index.search(&clips, "hello").len(), 1);
        assert_eq!(index.search(&clips, "Hello").len(), 1);
        assert!(index.search(&clips, "HELLO").is_empty());

        index.set_mode(SearchMode::CaseSensitive);
        assert!(index.search(&clips, "hello").is_empty());
    }

    #[test]
    fn test_toggle_mode() {
        let mut index = SearchIndex::new();
        assert_eq!(index.mode(), SearchMode::SmartCase);

        index.toggle_mode();
        assert_eq!(index.mode(), SearchMode::CaseSensitive);

        index.toggle_mode();
        assert_eq!(index.mode(), SearchMode::SmartCase);
    }

    #[test]
    fn test_search_file_entries_by_path() {
        let mut index = SearchIndex::new();
        let clips = vec![ClipEntry::new(
            7,
            ClipContent::Files(vec![PathBuf::from("/home/me/quarterly-report.pdf")]),
        )];
        assert_eq!(index.search(&clips, "quarterly").len(), 1);
    }

    #[test]
    fn test_kind_filter_cycle_and_match() {
        let text = ClipEntry::new(1, ClipContent::Text("x".into()));
        let files = ClipEntry::new(2, ClipContent::Files(vec![PathBuf::from("/x")]));

        let mut filter = KindFilter::All;
        assert!(filter.matches(&text) && filter.matches(&files));

        filter = filter.next();
        assert_eq!(filter, KindFilter::Only(ClipKind::Text));
        assert!(filter.matches(&text));
        assert!(!filter.matches(&files));

        filter = filter.next().next();
        assert_eq!(filter, KindFilter::Only(ClipKind::Files));
        assert!(filter.matches(&files));
        assert_eq!(filter.next(), KindFilter::All);
    }
}
