use crate::catalog::CatalogEntry;
use std::collections::BTreeSet;

/// Label shown on the wildcard control.
pub const ALL_LABEL: &str = "All";

/// Which category the main grid is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategorySelection {
    /// No restriction; matches entries with any or no category.
    #[default]
    All,
    Named(String),
}

impl CategorySelection {
    /// Resolve a configured default. "All", blank and unknown labels map to
    /// the wildcard.
    pub fn resolve(raw: Option<&str>, labels: &[String]) -> Self {
        match raw.map(str::trim) {
            Some(label) if label != ALL_LABEL && labels.iter().any(|l| l == label) => {
                Self::Named(label.to_string())
            }
            _ => Self::All,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Named(label) => label,
        }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Named(label) => entry.category.as_deref() == Some(label.as_str()),
        }
    }
}

/// One filter control in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryControl {
    pub selection: CategorySelection,
    pub active: bool,
}

impl CategoryControl {
    pub fn label(&self) -> &str {
        self.selection.label()
    }
}

/// Distinct non-empty values of one text field, sorted ascending with
/// exact, case-sensitive dedupe.
pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Derived category labels plus the single active selection.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    labels: Vec<String>,
    active: CategorySelection,
}

impl CategoryIndex {
    pub fn build(entries: &[CatalogEntry], default_category: Option<&str>) -> Self {
        let labels = distinct_sorted(entries.iter().map(|e| e.category.as_deref()));
        let active = CategorySelection::resolve(default_category, &labels);
        Self { labels, active }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn active(&self) -> &CategorySelection {
        &self.active
    }

    /// Wildcard first, then labels ascending. Exactly one is active.
    pub fn controls(&self) -> Vec<CategoryControl> {
        std::iter::once(CategorySelection::All)
            .chain(self.labels.iter().cloned().map(CategorySelection::Named))
            .map(|selection| CategoryControl {
                active: selection == self.active,
                selection,
            })
            .collect()
    }

    /// Position of the active control within [`controls`](Self::controls).
    pub fn active_position(&self) -> usize {
        match &self.active {
            CategorySelection::All => 0,
            CategorySelection::Named(label) => self
                .labels
                .iter()
                .position(|l| l == label)
                .map_or(0, |i| i + 1),
        }
    }

    /// Make `selection` the active control. Returns `false` and leaves the
    /// state alone when it names a label the catalog does not have.
    pub fn select(&mut self, selection: CategorySelection) -> bool {
        if let CategorySelection::Named(label) = &selection {
            if !self.labels.contains(label) {
                return false;
            }
        }
        self.active = selection;
        true
    }

    /// Select by control position (0 is the wildcard).
    pub fn select_position(&mut self, position: usize) -> bool {
        match position {
            0 => self.select(CategorySelection::All),
            n => match self.labels.get(n - 1) {
                Some(label) => {
                    self.active = CategorySelection::Named(label.clone());
                    true
                }
                None => false,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::entry;
    use proptest::prelude::*;

    fn sample() -> Vec<CatalogEntry> {
        vec![
            entry("Reindeer", "Christmas", None),
            entry("Cat", "Animals", None),
            entry("Untitled", "", None),
            entry("Dog", "Animals", None),
            entry("Lower", "animals", None),
        ]
    }

    #[test]
    fn test_labels_sorted_deduped_case_sensitive() {
        let index = CategoryIndex::build(&sample(), None);
        assert_eq!(index.labels(), ["Animals", "Christmas", "animals"]);
    }

    #[test]
    fn test_controls_start_with_wildcard() {
        let index = CategoryIndex::build(&sample(), None);
        let controls = index.controls();
        assert_eq!(controls.len(), 4);
        assert_eq!(controls[0].label(), ALL_LABEL);
        assert!(controls[0].active);
        assert_eq!(controls.iter().filter(|c| c.active).count(), 1);
    }

    #[test]
    fn test_default_category_preselected() {
        let index = CategoryIndex::build(&sample(), Some("Christmas"));
        assert_eq!(index.active(), &CategorySelection::Named("Christmas".into()));
        assert_eq!(index.active_position(), 2);
    }

    #[test]
    fn test_unknown_default_falls_back_to_wildcard() {
        let index = CategoryIndex::build(&sample(), Some("Easter"));
        assert_eq!(index.active(), &CategorySelection::All);
        let index = CategoryIndex::build(&sample(), Some("All"));
        assert_eq!(index.active(), &CategorySelection::All);
    }

    #[test]
    fn test_reselection_leaves_one_active() {
        let mut index = CategoryIndex::build(&sample(), None);
        assert!(index.select_position(1));
        assert!(index.select_position(2));
        assert!(index.select(CategorySelection::Named("Animals".into())));
        assert!(index.select_position(2));

        let controls = index.controls();
        let active: Vec<_> = controls.iter().filter(|c| c.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label(), "Christmas");
    }

    #[test]
    fn test_select_unknown_is_rejected() {
        let mut index = CategoryIndex::build(&sample(), Some("Animals"));
        assert!(!index.select(CategorySelection::Named("Easter".into())));
        assert!(!index.select_position(99));
        assert_eq!(index.active().label(), "Animals");
    }

    #[test]
    fn test_wildcard_matches_missing_category() {
        let untitled = entry("Untitled", "", None);
        assert!(CategorySelection::All.matches(&untitled));
        assert!(!CategorySelection::Named("Animals".into()).matches(&untitled));
    }

    proptest! {
        #[test]
        fn prop_labels_are_sorted_distinct_nonempty(
            cats in proptest::collection::vec(proptest::option::of("[a-cA-C]{0,3}"), 0..30)
        ) {
            let entries: Vec<CatalogEntry> = cats
                .iter()
                .map(|c| CatalogEntry { category: c.clone().filter(|s| !s.is_empty()), ..Default::default() })
                .collect();
            let index = CategoryIndex::build(&entries, None);

            let mut expected: Vec<String> = cats.into_iter().flatten().filter(|c| !c.is_empty()).collect();
            expected.sort();
            expected.dedup();

            prop_assert_eq!(index.labels(), expected.as_slice());
            let controls = index.controls();
            prop_assert_eq!(controls[0].selection.clone(), CategorySelection::All);
            prop_assert_eq!(controls.len(), expected.len() + 1);
        }
    }
}
