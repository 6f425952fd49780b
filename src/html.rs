//! Static HTML rendering of a [`PageView`].
//!
//! Element ids and class names match the hosted page's stylesheet and
//! script, so an exported page can be dropped in place of the live one.

use crate::cards::{ActionKind, Card, CardVariant, EMPTY_STATE_MESSAGE, GridView, NewSectionView};
use crate::controller::{AgeSelector, GridRegion, PageView};
use crate::categories::CategoryControl;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

fn render_image(out: &mut String, card: &Card) {
    if let Some(thumb) = &card.thumbnail {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\"{} />",
            attr(&thumb.src),
            attr(&thumb.alt),
            if thumb.lazy { " loading=\"lazy\"" } else { "" },
        ));
    }
}

fn render_action(out: &mut String, class: &str, href: &str, label: &str, kind: ActionKind) {
    let extra = match kind {
        ActionKind::Download => " download",
        ActionKind::OpenInNewView => " target=\"_blank\" rel=\"noopener\"",
    };
    out.push_str(&format!(
        "<a href=\"{}\" class=\"{}\"{}>{}</a>",
        attr(href),
        class,
        extra,
        text(label),
    ));
}

pub fn render_card(out: &mut String, card: &Card) {
    match card.variant {
        CardVariant::Full => {
            out.push_str("<article class=\"sheet-card\"><div class=\"sheet-card-image\">");
            render_image(out, card);
            out.push_str("</div>");
            out.push_str(&format!("<h3 class=\"sheet-card-title\">{}</h3>", text(&card.title)));
            if let Some(meta) = &card.meta {
                out.push_str(&format!("<p class=\"sheet-card-meta\">{}</p>", text(meta)));
            }
            out.push_str("<div class=\"sheet-card-actions\">");
            for action in &card.actions {
                let class = match action.kind {
                    ActionKind::Download => "btn-secondary",
                    ActionKind::OpenInNewView => "btn-outline",
                };
                render_action(out, class, &action.href, action.label, action.kind);
            }
            out.push_str("</div></article>");
        }
        CardVariant::Compact => {
            out.push_str("<article class=\"new-card\">");
            render_image(out, card);
            out.push_str(&format!("<div class=\"new-card-title\">{}</div>", text(&card.title)));
            if let Some(meta) = &card.meta {
                out.push_str(&format!("<div class=\"new-card-meta\">{}</div>", text(meta)));
            }
            out.push_str("<div class=\"new-card-actions\">");
            for action in &card.actions {
                render_action(out, "new-btn", &action.href, action.label, action.kind);
            }
            out.push_str("</div></article>");
        }
    }
}

fn render_categories(out: &mut String, controls: &[CategoryControl]) {
    out.push_str("<div id=\"category-buttons\">");
    for control in controls {
        out.push_str(&format!(
            "<button type=\"button\" class=\"category-btn{}\" data-category=\"{}\">{}</button>",
            if control.active { " active" } else { "" },
            attr(control.label()),
            text(control.label()),
        ));
    }
    out.push_str("</div>");
}

fn render_age_selector(out: &mut String, selector: &AgeSelector) {
    out.push_str("<select id=\"ageFilter\"><option value=\"\">All ages</option>");
    for option in &selector.options {
        let selected = selector.active.as_deref() == Some(option.as_str());
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            attr(option),
            if selected { " selected" } else { "" },
            text(option),
        ));
    }
    out.push_str("</select>");
}

fn render_grid(out: &mut String, grid: &GridRegion) {
    out.push_str("<div id=\"grid\">");
    match grid {
        GridRegion::Cards(GridView { cards, .. }) => {
            for card in cards {
                render_card(out, card);
            }
        }
        GridRegion::Error(message) => {
            out.push_str(&format!("<p style=\"color:#b91c1c;\">{}</p>", text(message)));
        }
    }
    out.push_str("</div>");
}

fn render_new_section(out: &mut String, section: &NewSectionView) {
    out.push_str("<div id=\"newGrid\">");
    match section.placeholder {
        Some(placeholder) => out.push_str(&format!("<p>{}</p>", text(placeholder))),
        None => {
            for card in &section.cards {
                render_card(out, card);
            }
        }
    }
    out.push_str("</div>");
}

/// Page body regions in document order. Absent regions emit nothing.
pub fn render_fragment(view: &PageView) -> String {
    let mut out = String::new();

    if let Some(section) = &view.new_section {
        out.push_str("<section class=\"new-section\"><h2>New Coloring Pages</h2>");
        render_new_section(&mut out, section);
        out.push_str("</section>");
    }

    out.push_str("<section class=\"browse-section\"><h2>Browse</h2>");
    if let Some(controls) = &view.categories {
        render_categories(&mut out, controls);
    }
    if let Some(search) = &view.search_text {
        out.push_str(&format!(
            "<input id=\"search\" type=\"search\" placeholder=\"Search coloring pages...\" value=\"{}\" />",
            attr(search),
        ));
    }
    if let Some(selector) = &view.age_selector {
        render_age_selector(&mut out, selector);
    }
    if let Some(grid) = &view.grid {
        render_grid(&mut out, grid);
    }
    if let Some(visible) = view.empty_state_visible {
        out.push_str(&format!(
            "<p id=\"emptyState\" class=\"empty-state{}\">{}</p>",
            if visible { "" } else { " hidden" },
            text(EMPTY_STATE_MESSAGE),
        ));
    }
    out.push_str("</section>");

    if let Some(year) = view.footer_year {
        out.push_str(&format!("<footer>&copy; <span id=\"year\">{year}</span></footer>"));
    }
    out
}

/// A standalone document around [`render_fragment`].
pub fn render_document(view: &PageView, title: &str, stylesheet: Option<&str>) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str(&format!("<title>{}</title>\n", text(title)));
    if let Some(href) = stylesheet {
        out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\" />\n", attr(href)));
    }
    out.push_str("</head>\n<body>\n");
    out.push_str(&render_fragment(view));
    out.push_str("\n</body>\n</html>\n");
    out
}
