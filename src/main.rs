mod app;
mod audit;
mod cards;
mod catalog;
mod categories;
mod config;
mod controller;
mod download;
mod filter;
mod html;
mod loader;
mod logging;
mod recency;
mod ui;

use app::{App, Focus, InputMode};
use cards::{ActionKind, PresentationMode};
use catalog::Catalog;
use categories::CategorySelection;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use config::Settings;
use controller::CatalogController;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use loader::{CatalogSource, LoadError, Loader};
use std::io::Write;
use std::path::PathBuf;

/// Browse, filter and export a catalog of printable coloring sheets
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog URL or JSON file (overrides the config file)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Category to preselect, like a landing page would
    #[arg(long, global = true)]
    default_category: Option<String>,

    /// Card presentation
    #[arg(long, value_enum, global = true)]
    mode: Option<PresentationMode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog interactively (default)
    Browse,
    /// Print the filtered catalog or the newest pages
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive search over title, category and tags
        #[arg(long)]
        search: Option<String>,
        /// Only this age range
        #[arg(long)]
        age: Option<String>,
        /// Show the "new" section instead of the filtered grid
        #[arg(long, conflicts_with_all = ["category", "search", "age"])]
        new: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the initial page as static HTML
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Document title
        #[arg(long, default_value = "Free Printable Coloring Pages")]
        title: String,
        /// Stylesheet href to link from the document head
        #[arg(long)]
        stylesheet: Option<String>,
        /// Emit only the body regions, without the document wrapper
        #[arg(long)]
        fragment: bool,
    },
    /// Report entries with missing titles, PDFs, images or thumbnails
    Audit {
        /// Local copy of the site root, to check that thumbnail files exist
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the PDF of the first entry whose title contains TITLE
    Download {
        title: String,
        /// Target directory (defaults to the configured download dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(source) = cli.source {
        settings.data_source = source;
    }
    if let Some(category) = cli.default_category {
        settings.default_category = Some(category);
    }
    if let Some(mode) = cli.mode {
        settings.presentation = mode;
    }

    let command = cli.command.unwrap_or(Commands::Browse);
    let interactive = matches!(command, Commands::Browse);
    let _log_guard = match logging::init(&logging::log_dir(), &settings.log_level, !interactive) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    };

    let source = match CatalogSource::parse(&settings.data_source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match command {
        Commands::Browse => {
            let controller = CatalogController::new(&settings);
            let mut app = App::new(controller, source.clone(), settings.resolved_download_dir());

            // Init terminal
            let mut terminal = ratatui::init();
            let size = terminal.size()?;
            app.update_columns(size.width);

            let result = run_app(&mut terminal, &mut app, Loader::new(source)).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::List {
            category,
            search,
            age,
            new,
            json,
        } => {
            let catalog = load_or_exit(source).await;
            let filters = ListFilters { category, search, age };
            let controller = match list_controller(&settings, catalog, filters) {
                Ok(c) => c,
                Err(msg) => {
                    eprintln!("Error: {msg}");
                    std::process::exit(1);
                }
            };

            let entries = if new {
                recency::rank_recent(controller.catalog(), settings.new_limit)
            } else {
                controller.filtered()
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                eprintln!("{}", cards::EMPTY_STATE_MESSAGE);
            } else {
                for entry in entries {
                    println!(
                        "{}\t{}\t{}",
                        entry.display_title(),
                        entry.category.as_deref().unwrap_or("-"),
                        entry.pdf_href()
                    );
                }
            }
        }
        Commands::Export {
            output,
            title,
            stylesheet,
            fragment,
        } => {
            let catalog = load_or_exit(source).await;
            let mut controller = CatalogController::new(&settings);
            controller.on_loaded(catalog);

            let view = controller.render_page(chrono::Local::now().year());
            let markup = if fragment {
                html::render_fragment(&view)
            } else {
                html::render_document(&view, &title, stylesheet.as_deref())
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, markup)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => std::io::stdout().write_all(markup.as_bytes())?,
            }
        }
        Commands::Audit { assets, json } => {
            let catalog = load_or_exit(source).await;
            let report = audit::audit(&catalog, assets.as_deref());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_empty() {
                eprintln!("All {} entries look complete.", catalog.len());
            } else {
                for entry in &report {
                    println!("#{} {}", entry.index, entry.title);
                    for finding in &entry.findings {
                        println!("    {finding}");
                    }
                }
                eprintln!("{} of {} entries need attention.", report.len(), catalog.len());
            }
        }
        Commands::Download { title, output_dir } => {
            let catalog = load_or_exit(source.clone()).await;
            let needle = filter::normalize_term(&title);
            let Some(entry) = catalog
                .iter()
                .find(|e| e.display_title().to_lowercase().contains(&needle))
            else {
                eprintln!("Error: no coloring page titled like {title:?}");
                std::process::exit(1);
            };

            let url = download::resolve_link(&source, entry.pdf_href())?;
            let dir = output_dir.unwrap_or_else(|| settings.resolved_download_dir());
            eprintln!("Downloading {} from {}...", entry.display_title(), url);
            let path = download::download_pdf(&url, &dir, true).await?;
            eprintln!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// Filters given to `list` on the command line.
#[derive(Default)]
struct ListFilters {
    category: Option<String>,
    search: Option<String>,
    age: Option<String>,
}

/// Controller for `list`. Each requested filter turns on its region, so the
/// configured page layout never silently drops a command-line filter.
fn list_controller(settings: &Settings, catalog: Catalog, filters: ListFilters) -> Result<CatalogController, String> {
    let mut settings = settings.clone();
    settings.layout.category_buttons |= filters.category.is_some();
    settings.layout.search |= filters.search.is_some();
    settings.layout.age_select |= filters.age.is_some();

    let mut controller = CatalogController::new(&settings);
    controller.on_loaded(catalog);

    if let Some(category) = filters.category {
        if !controller.select_category(CategorySelection::Named(category.clone())) {
            return Err(format!("unknown category: {category}"));
        }
    }
    if let Some(search) = filters.search {
        controller.set_search(&search);
    }
    if let Some(age) = filters.age {
        if !controller.set_age_filter(Some(age.clone())) {
            return Err(format!("unknown age range: {age}"));
        }
    }
    Ok(controller)
}

/// One-shot load for the non-interactive commands; failures end the process.
async fn load_or_exit(source: CatalogSource) -> Catalog {
    match Loader::new(source).load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "catalog load failed");
            eprintln!("{}", e.user_message());
            eprintln!("Cause: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    loader: Loader,
) -> Result<(), Box<dyn std::error::Error>> {
    // Paint the pending state, then do the one fetch.
    terminal.draw(|frame| ui::render(app, frame))?;
    let result: Result<Catalog, LoadError> = loader.load().await;
    app.controller.finish_load(result);
    app.on_loaded();

    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(terminal, app, key).await?;
                }
                Event::Resize(width, _) => {
                    app.update_columns(width);
                }
                _ => {}
            }
        }
    }
}

async fn handle_key(terminal: &mut ratatui::DefaultTerminal, app: &mut App, key: KeyEvent) -> std::io::Result<()> {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return Ok(());
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') if app.controller.layout().search => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Tab => {
            app.focus_next();
        }
        KeyCode::BackTab => {
            app.focus_prev();
        }
        KeyCode::Left | KeyCode::Char('h') => app.move_left(),
        KeyCode::Right | KeyCode::Char('l') => app.move_right(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Enter if app.focus == Focus::Categories => {
            app.activate_category();
        }
        KeyCode::Char('a') => {
            app.cycle_age();
        }
        KeyCode::Char('o') | KeyCode::Enter => {
            if let Some(link) = app.selected_link(ActionKind::OpenInNewView) {
                let target = download::resolve_link(&app.source, &link)
                    .map(|u| u.to_string())
                    .unwrap_or(link);
                app.status_msg = if open_external(&target) {
                    format!("Opening: {target}")
                } else {
                    format!("Link: {target} (no opener available)")
                };
            }
        }
        KeyCode::Char('y') => {
            if let Some(link) = app.selected_link(ActionKind::OpenInNewView) {
                app.status_msg = if copy_to_clipboard(&link) {
                    format!("Copied: {link}")
                } else {
                    format!("Link: {link} (clipboard not available)")
                };
            }
        }
        KeyCode::Char('d') => {
            if let Some(link) = app.selected_link(ActionKind::Download) {
                match download::resolve_link(&app.source, &link) {
                    Ok(url) => {
                        // The fetch blocks the loop, so show it first.
                        app.begin_download(&url);
                        terminal.draw(|frame| ui::render(app, frame))?;
                        app.status_msg = match download::download_pdf(&url, &app.download_dir, false).await {
                            Ok(path) => format!("Saved {}", path.display()),
                            Err(e) => {
                                tracing::error!(error = %e, %url, "download failed");
                                format!("Download failed: {e}")
                            }
                        };
                    }
                    Err(e) => app.status_msg = format!("Cannot download: {e}"),
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    let mut changed = false;
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search.clear();
            changed = true;
        }
        KeyCode::Backspace => {
            app.search.pop();
            changed = true;
        }
        KeyCode::Char(c) => {
            app.search.push(c);
            changed = true;
        }
        _ => {}
    }

    if changed {
        app.apply_search();
    }
}

fn open_external(target: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        tokio::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = tokio::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        tokio::process::Command::new("xdg-open")
    };
    command
        .arg(target)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());
    spawn_reaped(command)
}

/// Start `command` without waiting; a background task collects its exit.
fn spawn_reaped(mut command: tokio::process::Command) -> bool {
    match command.spawn() {
        Ok(mut child) => {
            tokio::spawn(async move {
                let _ = child.wait().await;
            });
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "spawn failed");
            false
        }
    }
}

/// Try xclip, then wl-copy.
fn copy_to_clipboard(text: &str) -> bool {
    let candidates: [(&str, &[&str]); 2] = [("xclip", &["-selection", "clipboard"]), ("wl-copy", &[])];
    for (program, args) in candidates {
        if let Ok(mut child) = std::process::Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::piped())
            .spawn()
        {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::abc;
    use crate::controller::PageLayout;

    fn titles(controller: &CatalogController) -> Vec<&str> {
        controller.filtered().into_iter().map(|e| e.display_title()).collect()
    }

    #[test]
    fn test_list_filters_ignore_page_layout() {
        let settings = Settings {
            layout: PageLayout {
                category_buttons: false,
                search: false,
                ..Default::default()
            },
            ..Default::default()
        };

        let searched = list_controller(
            &settings,
            abc(),
            ListFilters {
                search: Some("b".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(titles(&searched), ["B"]);

        let by_category = list_controller(
            &settings,
            abc(),
            ListFilters {
                category: Some("X".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(titles(&by_category), ["A", "C"]);
    }

    #[test]
    fn test_list_rejects_unknown_filters() {
        let settings = Settings::default();
        let err = list_controller(
            &settings,
            abc(),
            ListFilters {
                category: Some("Nope".into()),
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(err.contains("unknown category"));

        let err = list_controller(
            &settings,
            abc(),
            ListFilters {
                age: Some("99".into()),
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(err.contains("unknown age range"));
    }

    #[tokio::test]
    async fn test_spawn_reaped_reports_missing_program() {
        let command = tokio::process::Command::new("sheet-explorer-no-such-opener");
        assert!(!spawn_reaped(command));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_reaped_starts_program() {
        assert!(spawn_reaped(tokio::process::Command::new("true")));
    }
}
