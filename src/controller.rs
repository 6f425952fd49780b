use crate::cards::{CardRenderer, GridView, NewSectionView};
use crate::catalog::{Catalog, CatalogEntry};
use crate::categories::{CategoryControl, CategoryIndex, CategorySelection, distinct_sorted};
use crate::config::Settings;
use crate::filter::{self, FilterState};
use crate::loader::{LOAD_ERROR_MESSAGE, LoadError};
use crate::recency;
use serde::{Deserialize, Serialize};

/// Which host regions exist. A missing region renders as `None` and the
/// operations that drive it do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub grid: bool,
    pub category_buttons: bool,
    pub search: bool,
    pub empty_state: bool,
    pub new_grid: bool,
    pub footer_year: bool,
    pub age_select: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            grid: true,
            category_buttons: true,
            search: true,
            empty_state: true,
            new_grid: true,
            footer_year: true,
            age_select: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// What the main grid region shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRegion {
    Cards(GridView),
    Error(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeSelector {
    pub options: Vec<String>,
    pub active: Option<String>,
}

/// Full description of the page for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub categories: Option<Vec<CategoryControl>>,
    pub search_text: Option<String>,
    pub age_selector: Option<AgeSelector>,
    pub grid: Option<GridRegion>,
    pub empty_state_visible: Option<bool>,
    pub new_section: Option<NewSectionView>,
    pub footer_year: Option<i32>,
}

/// Owns the catalog and the filter state. Filter mutations and renders are
/// the only ways in.
pub struct CatalogController {
    layout: PageLayout,
    renderer: CardRenderer,
    new_limit: usize,
    default_category: Option<String>,

    state: LoadState,
    catalog: Catalog,
    categories: CategoryIndex,
    ages: Vec<String>,
    filter: FilterState,
    search_text: String,
    new_section: NewSectionView,
}

impl CatalogController {
    pub fn new(settings: &Settings) -> Self {
        Self {
            layout: settings.layout,
            renderer: CardRenderer::new(settings.presentation),
            new_limit: settings.new_limit,
            default_category: settings.default_category.clone(),

            state: LoadState::Pending,
            catalog: Catalog::from(Vec::new()),
            categories: CategoryIndex::default(),
            ages: Vec::new(),
            filter: FilterState::default(),
            search_text: String::new(),
            new_section: NewSectionView::default(),
        }
    }

    /// Apply the outcome of the one startup load.
    pub fn finish_load(&mut self, result: Result<Catalog, LoadError>) {
        match result {
            Ok(catalog) => self.on_loaded(catalog),
            Err(e) => self.on_load_failed(&e),
        }
    }

    pub fn on_loaded(&mut self, catalog: Catalog) {
        if self.state != LoadState::Pending {
            tracing::warn!("catalog already populated, ignoring second load");
            return;
        }

        self.categories = CategoryIndex::build(&catalog, self.default_category.as_deref());
        self.ages = distinct_sorted(catalog.iter().map(|e| e.age_range.as_deref()));
        // Search text typed while pending still applies.
        self.filter.category = self.categories.active().clone();

        let recent = recency::rank_recent(&catalog, self.new_limit);
        self.new_section = self.renderer.render_new_section(&recent);

        tracing::debug!(
            entries = catalog.len(),
            categories = self.categories.labels().len(),
            active = self.categories.active().label(),
            "catalog ready"
        );
        self.catalog = catalog;
        self.state = LoadState::Ready;
    }

    pub fn on_load_failed(&mut self, err: &LoadError) {
        tracing::error!(error = %err, "failed to load coloring sheets");
        self.state = LoadState::Failed;
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    // ── Filter mutations ──

    pub fn select_category(&mut self, selection: CategorySelection) -> bool {
        if !self.is_ready() || !self.layout.category_buttons {
            return false;
        }
        if !self.categories.select(selection) {
            return false;
        }
        self.filter.category = self.categories.active().clone();
        tracing::debug!(category = self.filter.category.label(), "category selected");
        true
    }

    /// Select by control position; 0 is the wildcard.
    pub fn select_category_at(&mut self, position: usize) -> bool {
        if !self.is_ready() || !self.layout.category_buttons {
            return false;
        }
        if !self.categories.select_position(position) {
            return false;
        }
        self.filter.category = self.categories.active().clone();
        tracing::debug!(category = self.filter.category.label(), "category selected");
        true
    }

    /// Replace the search box contents.
    pub fn set_search(&mut self, raw: &str) {
        if !self.layout.search {
            return;
        }
        self.search_text = raw.to_string();
        self.filter.set_search(raw);
        tracing::debug!(term = self.filter.search_term(), "search updated");
    }

    /// Set the age filter; unknown values are ignored.
    pub fn set_age_filter(&mut self, age: Option<String>) -> bool {
        if !self.layout.age_select {
            return false;
        }
        match age {
            Some(a) if !self.ages.contains(&a) => false,
            age => {
                self.filter.age = age;
                true
            }
        }
    }

    /// Step through "any age" and each age option in order.
    pub fn cycle_age_filter(&mut self) -> bool {
        let next = match &self.filter.age {
            None => self.ages.first().cloned(),
            Some(current) => {
                let pos = self.ages.iter().position(|a| a == current);
                pos.and_then(|p| self.ages.get(p + 1)).cloned()
            }
        };
        self.set_age_filter(next)
    }

    // ── Rendering ──

    /// Entries currently passing the filters, in catalog order.
    pub fn filtered(&self) -> Vec<&CatalogEntry> {
        if !self.is_ready() {
            return Vec::new();
        }
        filter::apply(&self.catalog, &self.filter)
    }

    /// Rebuild the main grid. `None` when there is no grid or nothing has
    /// loaded yet.
    pub fn render_grid(&self) -> Option<GridRegion> {
        if !self.layout.grid {
            return None;
        }
        match self.state {
            LoadState::Pending => None,
            LoadState::Failed => Some(GridRegion::Error(LOAD_ERROR_MESSAGE)),
            LoadState::Ready => Some(GridRegion::Cards(self.renderer.render_grid(&self.filtered()))),
        }
    }

    /// The "new" section, ranked once at load and independent of filters.
    pub fn new_section(&self) -> Option<&NewSectionView> {
        (self.is_ready() && self.layout.new_grid).then_some(&self.new_section)
    }

    pub fn category_controls(&self) -> Option<Vec<CategoryControl>> {
        (self.is_ready() && self.layout.category_buttons).then(|| self.categories.controls())
    }

    pub fn age_selector(&self) -> Option<AgeSelector> {
        (self.is_ready() && self.layout.age_select).then(|| AgeSelector {
            options: self.ages.clone(),
            active: self.filter.age.clone(),
        })
    }

    pub fn render_page(&self, year: i32) -> PageView {
        let grid = self.render_grid();
        let empty_state_visible = match &grid {
            Some(GridRegion::Cards(view)) if self.layout.empty_state => Some(view.empty_state_visible),
            Some(GridRegion::Error(_)) if self.layout.empty_state => Some(false),
            _ => None,
        };

        PageView {
            categories: self.category_controls(),
            search_text: self.layout.search.then(|| self.search_text.clone()),
            age_selector: self.age_selector(),
            grid,
            empty_state_visible,
            new_section: self.new_section().cloned(),
            footer_year: self.layout.footer_year.then_some(year),
        }
    }
}
