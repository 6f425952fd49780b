use crate::catalog::CatalogEntry;
use serde::{Deserialize, Serialize};

pub const EMPTY_STATE_MESSAGE: &str = "No coloring pages match your search.";
pub const NO_NEW_PAGES_MESSAGE: &str = "No new pages available yet. Check back soon!";
pub const DEFAULT_AGE_RANGE: &str = "3+";
const DEFAULT_META_CATEGORY: &str = "Coloring";

/// How full cards describe and link an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Meta line is the category; the open action targets the PDF.
    #[default]
    Classic,
    /// Meta line adds the age range; the open action targets the image.
    Gallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    Full,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Forced download of the target.
    Download,
    /// Open the target in a new browser tab or external viewer.
    OpenInNewView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAction {
    pub label: &'static str,
    pub href: String,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub src: String,
    pub alt: String,
    pub lazy: bool,
}

/// Description of one rendered card. Adapters turn this into widgets or
/// markup; nothing here touches a live UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub variant: CardVariant,
    pub thumbnail: Option<Thumbnail>,
    pub title: String,
    pub meta: Option<String>,
    pub actions: Vec<CardAction>,
}

impl Card {
    pub fn action(&self, kind: ActionKind) -> Option<&CardAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }
}

/// Contents of the main grid after a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub cards: Vec<Card>,
    pub empty_state_visible: bool,
}

/// Contents of the "new" section. `placeholder` is set when there is nothing
/// to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewSectionView {
    pub cards: Vec<Card>,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardRenderer {
    pub mode: PresentationMode,
}

impl CardRenderer {
    pub fn new(mode: PresentationMode) -> Self {
        Self { mode }
    }

    fn thumbnail(entry: &CatalogEntry) -> Option<Thumbnail> {
        entry.thumbnail_src().map(|src| Thumbnail {
            src: src.to_string(),
            alt: entry.display_title().to_string(),
            lazy: true,
        })
    }

    fn meta_line(&self, entry: &CatalogEntry) -> Option<String> {
        match self.mode {
            PresentationMode::Classic => entry.category.clone(),
            PresentationMode::Gallery => Some(format!(
                "{} • Ages {}",
                entry.category.as_deref().unwrap_or(DEFAULT_META_CATEGORY),
                entry.age_range.as_deref().unwrap_or(DEFAULT_AGE_RANGE),
            )),
        }
    }

    pub fn full_card(&self, entry: &CatalogEntry) -> Card {
        let open = match self.mode {
            PresentationMode::Classic => CardAction {
                label: "Open in Browser",
                href: entry.pdf_href().to_string(),
                kind: ActionKind::OpenInNewView,
            },
            PresentationMode::Gallery => CardAction {
                label: "View Image",
                href: entry.full_image_src().unwrap_or("").to_string(),
                kind: ActionKind::OpenInNewView,
            },
        };

        Card {
            variant: CardVariant::Full,
            thumbnail: Self::thumbnail(entry),
            title: entry.display_title().to_string(),
            meta: self.meta_line(entry),
            actions: vec![
                CardAction {
                    label: "Download PDF",
                    href: entry.pdf_href().to_string(),
                    kind: ActionKind::Download,
                },
                open,
            ],
        }
    }

    pub fn compact_card(&self, entry: &CatalogEntry) -> Card {
        Card {
            variant: CardVariant::Compact,
            thumbnail: Self::thumbnail(entry),
            title: entry.display_title().to_string(),
            meta: self.meta_line(entry),
            actions: vec![CardAction {
                label: "View / Download PDF",
                href: entry.pdf_href().to_string(),
                kind: ActionKind::OpenInNewView,
            }],
        }
    }

    /// Rebuild the whole grid from `entries`.
    pub fn render_grid(&self, entries: &[&CatalogEntry]) -> GridView {
        GridView {
            cards: entries.iter().map(|e| self.full_card(e)).collect(),
            empty_state_visible: entries.is_empty(),
        }
    }

    pub fn render_new_section(&self, entries: &[&CatalogEntry]) -> NewSectionView {
        NewSectionView {
            cards: entries.iter().map(|e| self.compact_card(e)).collect(),
            placeholder: entries.is_empty().then_some(NO_NEW_PAGES_MESSAGE),
        }
    }
}
