use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Global", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ?         ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("    q         ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
        Line::from(vec![
            Span::styled("    Tab       ", Style::default().fg(Color::Yellow)),
            Span::raw("Move focus: categories, grid, new pages"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Filtering", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    /         ", Style::default().fg(Color::Yellow)),
            Span::raw("Search titles, categories and tags"),
        ]),
        Line::from(vec![
            Span::styled("    Esc       ", Style::default().fg(Color::Yellow)),
            Span::raw("Clear the search"),
        ]),
        Line::from(vec![
            Span::styled("    ←/→ Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Pick a category (in the category bar)"),
        ]),
        Line::from(vec![
            Span::styled("    a         ", Style::default().fg(Color::Yellow)),
            Span::raw("Cycle the age filter (when enabled)"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Cards", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ←↑↓→ hjkl ", Style::default().fg(Color::Yellow)),
            Span::raw("Move between cards"),
        ]),
        Line::from(vec![
            Span::styled("    d         ", Style::default().fg(Color::Yellow)),
            Span::raw("Download the PDF"),
        ]),
        Line::from(vec![
            Span::styled("    o         ", Style::default().fg(Color::Yellow)),
            Span::raw("Open in browser / viewer"),
        ]),
        Line::from(vec![
            Span::styled("    y         ", Style::default().fg(Color::Yellow)),
            Span::raw("Copy link to clipboard"),
        ]),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help — Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
