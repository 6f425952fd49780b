use crate::catalog::CatalogEntry;
use crate::categories::CategorySelection;

/// User-controlled view parameters for the main grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: CategorySelection,
    search: String,
    /// `None` means any age.
    pub age: Option<String>,
}

impl FilterState {
    /// Store a raw search box value. Only the normalized form is kept.
    pub fn set_search(&mut self, raw: &str) {
        self.search = normalize_term(raw);
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.category.matches(entry) && age_matches(self.age.as_deref(), entry) && search_matches(&self.search, entry)
    }
}

/// Trim and lower-case a search box value.
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn age_matches(age: Option<&str>, entry: &CatalogEntry) -> bool {
    match age {
        None | Some("") => true,
        Some(age) => entry.age_range.as_deref() == Some(age),
    }
}

/// Substring match of an already-normalized term against title, category
/// and tags.
pub fn search_matches(term: &str, entry: &CatalogEntry) -> bool {
    term.is_empty() || entry.search_haystack().contains(term)
}

/// Entries passing every active predicate, in catalog order.
pub fn apply<'a>(entries: &'a [CatalogEntry], state: &FilterState) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|e| state.matches(e)).collect()
}
