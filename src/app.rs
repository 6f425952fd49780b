use crate::cards::{ActionKind, Card};
use crate::controller::{CatalogController, GridRegion, LoadState};
use crate::loader::CatalogSource;
use std::path::PathBuf;

/// Which region arrow keys move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Grid,
    New,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Categories => Self::Grid,
            Self::Grid => Self::New,
            Self::New => Self::Categories,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Categories => Self::New,
            Self::Grid => Self::Categories,
            Self::New => Self::Grid,
        }
    }
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Width of one grid card, borders included.
pub const CARD_WIDTH: u16 = 30;

/// Main application state.
pub struct App {
    pub controller: CatalogController,
    pub source: CatalogSource,
    pub download_dir: PathBuf,
    pub should_quit: bool,
    pub show_help: bool,

    pub focus: Focus,
    pub input_mode: InputMode,
    pub search: String,

    // Rebuilt after every filter change
    pub grid: Option<GridRegion>,

    pub category_cursor: usize,
    pub grid_selected: usize,
    pub new_selected: usize,
    pub columns: usize,

    pub status_msg: String,
}

impl App {
    pub fn new(controller: CatalogController, source: CatalogSource, download_dir: PathBuf) -> Self {
        let mut app = Self {
            controller,
            source,
            download_dir,
            should_quit: false,
            show_help: false,

            focus: Focus::Grid,
            input_mode: InputMode::Normal,
            search: String::new(),

            grid: None,

            category_cursor: 0,
            grid_selected: 0,
            new_selected: 0,
            columns: 1,

            status_msg: "Loading catalog...".to_string(),
        };
        app.rerender();
        app
    }

    /// Pick up the controller's state after the initial load.
    pub fn on_loaded(&mut self) {
        self.category_cursor = self.controller.categories().active_position();
        self.rerender();
        self.status_msg = match self.controller.state() {
            LoadState::Ready => format!("{} coloring pages loaded", self.controller.catalog().len()),
            LoadState::Failed => "Load failed, see log for details".to_string(),
            LoadState::Pending => "Loading catalog...".to_string(),
        };
    }

    /// Full rebuild of the main grid from the current filters.
    pub fn rerender(&mut self) {
        self.grid = self.controller.render_grid();
        self.grid_selected = 0;
    }

    pub fn grid_cards(&self) -> &[Card] {
        match &self.grid {
            Some(GridRegion::Cards(view)) => view.cards.as_slice(),
            _ => &[],
        }
    }

    pub fn new_cards(&self) -> &[Card] {
        self.controller
            .new_section()
            .map(|s| s.cards.as_slice())
            .unwrap_or_default()
    }

    /// Cards per row for a grid of the given width.
    pub fn update_columns(&mut self, width: u16) {
        self.columns = (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize;
    }

    pub fn apply_search(&mut self) {
        self.controller.set_search(&self.search);
        self.rerender();
        let shown = self.grid_cards().len();
        self.status_msg = format!(
            "{} pages match \"{}\"",
            shown,
            if self.search.trim().is_empty() { "all" } else { self.search.trim() }
        );
    }

    pub fn clear_search(&mut self) {
        if !self.search.is_empty() {
            self.search.clear();
            self.apply_search();
        }
    }

    /// Select the category under the cursor.
    pub fn activate_category(&mut self) {
        if self.controller.select_category_at(self.category_cursor) {
            self.rerender();
            self.status_msg = format!(
                "{}: {} pages",
                self.controller.filter().category.label(),
                self.grid_cards().len()
            );
        }
    }

    pub fn cycle_age(&mut self) {
        if self.controller.cycle_age_filter() {
            self.rerender();
            self.status_msg = match &self.controller.filter().age {
                Some(age) => format!("Ages {age}"),
                None => "Any age".to_string(),
            };
        }
    }

    pub fn move_left(&mut self) {
        match self.focus {
            Focus::Categories => self.category_cursor = self.category_cursor.saturating_sub(1),
            Focus::Grid => self.grid_selected = self.grid_selected.saturating_sub(1),
            Focus::New => self.new_selected = self.new_selected.saturating_sub(1),
        }
    }

    pub fn move_right(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.category_cursor + 1 < self.controller.categories().len() {
                    self.category_cursor += 1;
                }
            }
            Focus::Grid => {
                if self.grid_selected + 1 < self.grid_cards().len() {
                    self.grid_selected += 1;
                }
            }
            Focus::New => {
                if self.new_selected + 1 < self.new_cards().len() {
                    self.new_selected += 1;
                }
            }
        }
    }

    pub fn move_down(&mut self) {
        if self.focus == Focus::Grid {
            let target = self.grid_selected + self.columns;
            if target < self.grid_cards().len() {
                self.grid_selected = target;
            }
        }
    }

    pub fn move_up(&mut self) {
        if self.focus == Focus::Grid {
            self.grid_selected = self.grid_selected.saturating_sub(self.columns);
        }
    }

    /// Whether `focus` points at a region that is on screen. The grid
    /// always is.
    fn is_shown(&self, focus: Focus) -> bool {
        match focus {
            Focus::Categories => self.controller.category_controls().is_some(),
            Focus::Grid => true,
            Focus::New => self.controller.new_section().is_some(),
        }
    }

    pub fn focus_next(&mut self) {
        let mut focus = self.focus.next();
        while !self.is_shown(focus) {
            focus = focus.next();
        }
        self.focus = focus;
    }

    pub fn focus_prev(&mut self) {
        let mut focus = self.focus.prev();
        while !self.is_shown(focus) {
            focus = focus.prev();
        }
        self.focus = focus;
    }

    /// Status shown while a download holds the event loop.
    pub fn begin_download(&mut self, url: &reqwest::Url) {
        self.status_msg = format!("Downloading {}...", crate::download::file_name_for(url));
    }

    pub fn selected_card(&self) -> Option<&Card> {
        match self.focus {
            Focus::Grid => self.grid_cards().get(self.grid_selected),
            Focus::New => self.new_cards().get(self.new_selected),
            Focus::Categories => None,
        }
    }

    /// URL of the selected card's action, as written in the catalog.
    pub fn selected_link(&self, kind: ActionKind) -> Option<String> {
        self.selected_card()
            .and_then(|card| card.action(kind).or_else(|| card.actions.first()))
            .map(|a| a.href.clone())
            .filter(|href| !href.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::abc;
    use crate::config::Settings;
    use crate::controller::PageLayout;

    fn app() -> App {
        let mut controller = CatalogController::new(&Settings::default());
        controller.on_loaded(abc());
        let mut app = App::new(
            controller,
            CatalogSource::parse("https://example.com/data/coloring-sheets.json").unwrap(),
            PathBuf::from("."),
        );
        app.on_loaded();
        app
    }

    #[test]
    fn test_loaded_app_shows_everything() {
        let app = app();
        assert_eq!(app.grid_cards().len(), 3);
        assert_eq!(app.new_cards().len(), 3);
        assert_eq!(app.category_cursor, 0);
        assert!(app.status_msg.contains("3 coloring pages"));
    }

    #[test]
    fn test_category_activation_resets_selection() {
        let mut app = app();
        app.grid_selected = 2;
        app.focus = Focus::Categories;
        app.move_right();
        app.activate_category();
        assert_eq!(app.controller.filter().category.label(), "X");
        assert_eq!(app.grid_cards().len(), 2);
        assert_eq!(app.grid_selected, 0);
    }

    #[test]
    fn test_search_and_clear() {
        let mut app = app();
        app.search = "b".into();
        app.apply_search();
        assert_eq!(app.grid_cards().len(), 1);
        app.clear_search();
        assert_eq!(app.grid_cards().len(), 3);
    }

    #[test]
    fn test_grid_navigation_by_rows() {
        let mut app = app();
        app.update_columns(CARD_WIDTH * 2 + 2);
        assert_eq!(app.columns, 2);
        app.move_down();
        assert_eq!(app.grid_selected, 2);
        app.move_down();
        assert_eq!(app.grid_selected, 2);
        app.move_up();
        assert_eq!(app.grid_selected, 0);
    }

    #[test]
    fn test_selected_link() {
        let mut app = app();
        assert_eq!(app.selected_link(ActionKind::Download).as_deref(), Some("/pdf/a.pdf"));
        app.focus = Focus::New;
        // B is the newest entry.
        assert_eq!(app.selected_link(ActionKind::Download).as_deref(), Some("/pdf/b.pdf"));
        app.focus = Focus::Categories;
        assert!(app.selected_link(ActionKind::Download).is_none());
    }

    #[test]
    fn test_focus_cycles_through_shown_regions() {
        let mut app = app();
        app.focus_next();
        assert_eq!(app.focus, Focus::New);
        app.focus_next();
        assert_eq!(app.focus, Focus::Categories);
        app.focus_prev();
        assert_eq!(app.focus, Focus::New);
    }

    #[test]
    fn test_focus_skips_hidden_regions() {
        let settings = Settings {
            layout: PageLayout {
                category_buttons: false,
                new_grid: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut controller = CatalogController::new(&settings);
        controller.on_loaded(abc());
        let mut app = App::new(
            controller,
            CatalogSource::parse("https://example.com/data/coloring-sheets.json").unwrap(),
            PathBuf::from("."),
        );
        app.on_loaded();

        app.focus_next();
        assert_eq!(app.focus, Focus::Grid);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Grid);
    }

    #[test]
    fn test_begin_download_sets_status() {
        let mut app = app();
        let url = reqwest::Url::parse("https://example.com/pdf/a.pdf").unwrap();
        app.begin_download(&url);
        assert_eq!(app.status_msg, "Downloading a.pdf...");
    }
}
