use crate::cards::{ActionKind, Card};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

fn key_for(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Download => "d",
        ActionKind::OpenInNewView => "o",
    }
}

/// Draw one card into `area`. Full and compact cards share the layout; the
/// compact variant simply has fewer actions.
pub fn render_card(frame: &mut Frame, area: Rect, card: &Card, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let inner_width = area.width.saturating_sub(2) as usize;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {} ", truncate_str(&card.title, inner_width.saturating_sub(2))),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let mut lines = Vec::new();
    match &card.meta {
        Some(meta) => lines.push(Line::from(Span::styled(
            truncate_str(meta, inner_width),
            Style::default().fg(Color::Cyan),
        ))),
        None => lines.push(Line::from("")),
    }

    let thumb = card.thumbnail.as_ref().map_or("(no image)", |t| t.src.as_str());
    lines.push(Line::from(Span::styled(
        truncate_str(thumb, inner_width),
        Style::default().fg(Color::DarkGray),
    )));

    for action in &card.actions {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", key_for(action.kind)),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(truncate_str(action.label, inner_width.saturating_sub(4))),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
