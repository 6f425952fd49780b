use super::cards::{render_card, truncate_str};
use crate::app::{App, CARD_WIDTH, Focus, InputMode};
use crate::cards::EMPTY_STATE_MESSAGE;
use crate::controller::{GridRegion, LoadState};
use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const CARD_HEIGHT: u16 = 6;
const NEW_CARD_WIDTH: u16 = 26;
const NEW_CARD_HEIGHT: u16 = 5;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let layout = app.controller.layout();
    let new_section = app.controller.new_section();
    let age_selector = app.controller.age_selector();

    // header(3) + categories(3) + search(3) + age(1) + grid(min) + new(?) + status(1)
    let mut constraints = vec![Constraint::Length(3)];
    if layout.category_buttons {
        constraints.push(Constraint::Length(3));
    }
    if layout.search {
        constraints.push(Constraint::Length(3));
    }
    if age_selector.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(CARD_HEIGHT));
    if new_section.is_some() {
        constraints.push(Constraint::Length(NEW_CARD_HEIGHT + 2));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = chunks.iter().copied();
    let mut take = || next.next().unwrap_or_default();

    // ── Header ──
    let shown = app.grid_cards().len();
    let header = Paragraph::new(format!(
        " Coloring Sheets   [{} of {} pages]",
        shown,
        app.controller.catalog().len()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, take());

    if layout.category_buttons {
        render_categories(app, frame, take());
    }
    if layout.search {
        render_search(app, frame, take());
    }
    if let Some(selector) = &age_selector {
        let label = selector.active.as_deref().unwrap_or("any");
        let line = Line::from(vec![
            Span::styled(" Ages: ", Style::default().fg(Color::DarkGray)),
            Span::styled(label.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  ({} options, a to cycle)", selector.options.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), take());
    }

    render_grid(app, frame, take());

    if let Some(section) = new_section {
        let area = take();
        let focused = app.focus == Focus::New;
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(focus_style(focused))
            .title(" New Coloring Pages ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(placeholder) = section.placeholder {
            frame.render_widget(
                Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        } else {
            let fit = (inner.width / NEW_CARD_WIDTH).max(1) as usize;
            let start = scroll_start(app.new_selected, fit);
            for (slot, (i, card)) in section.cards.iter().enumerate().skip(start).take(fit).enumerate() {
                let rect = Rect {
                    x: inner.x + slot as u16 * NEW_CARD_WIDTH,
                    y: inner.y,
                    width: NEW_CARD_WIDTH.min(inner.width),
                    height: NEW_CARD_HEIGHT.min(inner.height),
                };
                render_card(frame, rect, card, focused && i == app.new_selected);
            }
        }
    }

    render_status(app, frame, take());
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// First item to draw so that `selected` stays on screen.
fn scroll_start(selected: usize, visible: usize) -> usize {
    (selected / visible.max(1)) * visible.max(1)
}

fn render_categories(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Categories;
    let mut spans = Vec::new();
    for (i, control) in app.controller.category_controls().unwrap_or_default().iter().enumerate() {
        let mut style = if control.active {
            Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if focused && i == app.category_cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} ", control.label()), style));
        spans.push(Span::raw(" "));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused))
            .title(" Categories "),
    );
    frame.render_widget(bar, area);
}

fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " 🔍 (Enter to keep, Esc to clear): "
    } else {
        " 🔍 Search (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, area);

    // Set cursor position when editing
    if app.input_mode == InputMode::Editing {
        use unicode_width::UnicodeWidthStr;
        let cursor_x = area.x + 1 + search_label.width() as u16 + app.search.width() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_grid(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Grid;
    let title = format!(" {} ", app.controller.filter().category.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.grid {
        None if app.controller.state() == LoadState::Pending => {
            frame.render_widget(
                Paragraph::new("Loading coloring sheets...").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
        None => {}
        Some(GridRegion::Error(message)) => {
            frame.render_widget(
                Paragraph::new(*message)
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true }),
                inner,
            );
        }
        Some(GridRegion::Cards(view)) => {
            if view.empty_state_visible {
                if app.controller.layout().empty_state {
                    frame.render_widget(
                        Paragraph::new(EMPTY_STATE_MESSAGE)
                            .style(Style::default().fg(Color::DarkGray))
                            .alignment(Alignment::Center),
                        inner,
                    );
                }
                return;
            }

            let columns = app.columns.max(1);
            let rows_visible = (inner.height / CARD_HEIGHT).max(1) as usize;
            let selected_row = app.grid_selected / columns;
            let first_row = scroll_start(selected_row, rows_visible);

            for (i, card) in view.cards.iter().enumerate().skip(first_row * columns).take(rows_visible * columns) {
                let row = (i / columns - first_row) as u16;
                let col = (i % columns) as u16;
                let rect = Rect {
                    x: inner.x + col * CARD_WIDTH,
                    y: inner.y + row * CARD_HEIGHT,
                    width: CARD_WIDTH.min(inner.width),
                    height: CARD_HEIGHT.min(inner.height),
                };
                if rect.bottom() > inner.bottom() || rect.right() > inner.right() {
                    continue;
                }
                render_card(frame, rect, card, focused && i == app.grid_selected);
            }
        }
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(8)])
        .split(area);

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(" Tab", key),
        Span::raw(" Focus  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("d", key),
        Span::raw(" Download  "),
        Span::styled("o", key),
        Span::raw(" Open  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
    ];
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let budget = (chunks[0].width as usize).saturating_sub(used);
    spans.push(Span::styled(
        truncate_str(&app.status_msg, budget),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    // Footer year
    if app.controller.layout().footer_year {
        let year = chrono::Local::now().year();
        frame.render_widget(
            Paragraph::new(format!("© {year} "))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    }
}
