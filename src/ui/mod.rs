mod browse;
mod cards;
mod help;

use crate::app::App;
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    browse::render(app, frame);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::abc;
    use crate::config::Settings;
    use crate::controller::CatalogController;
    use crate::loader::{CatalogSource, LOAD_ERROR_MESSAGE, LoadError};
    use ratatui::{Terminal, backend::TestBackend};
    use std::path::PathBuf;

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app(result: Result<crate::catalog::Catalog, LoadError>) -> App {
        let mut controller = CatalogController::new(&Settings::default());
        controller.finish_load(result);
        let mut app = App::new(controller, CatalogSource::File(PathBuf::from("sheets.json")), PathBuf::from("."));
        app.on_loaded();
        app.update_columns(100);
        app
    }

    #[test]
    fn test_browse_screen_shows_controls_and_cards() {
        let text = screen(&app(Ok(abc())), 100, 40);
        assert!(text.contains("All"));
        assert!(text.contains("Categories"));
        assert!(text.contains("Search"));
        assert!(text.contains("Download PDF"));
        assert!(text.contains("New Coloring Pages"));
    }

    #[test]
    fn test_empty_result_shows_message() {
        let mut app = app(Ok(abc()));
        app.search = "nothing-matches".into();
        app.apply_search();
        let text = screen(&app, 100, 40);
        assert!(text.contains("No coloring pages match"));
    }

    #[test]
    fn test_load_failure_shows_error() {
        let text = screen(&app(Err(LoadError::NotAnArray)), 100, 30);
        assert!(text.contains(&LOAD_ERROR_MESSAGE[..30]));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app(Ok(abc()));
        app.show_help = true;
        let text = screen(&app, 100, 40);
        assert!(text.contains("Keybindings"));
    }
}
