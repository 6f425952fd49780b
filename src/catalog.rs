use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Label used when an entry has no title.
pub const FALLBACK_TITLE: &str = "Coloring Page";

/// A single printable sheet from the catalog document.
///
/// Every field is optional on the wire. Empty strings are stored as `None`
/// so that "absent" and "blank" resolve through the same defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub thumb: Option<String>,
    pub pdf: Option<String>,
    pub added: Option<String>,
    pub age_range: Option<String>,
}

/// The full catalog, shared read-only after load.
pub type Catalog = Arc<[CatalogEntry]>;

// ── Value extraction helpers ──

fn val_string(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn val_strings(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl CatalogEntry {
    /// Build an entry from one element of the catalog array.
    ///
    /// Fields of the wrong JSON type are dropped; a non-object element yields
    /// an all-default entry instead of failing the whole catalog.
    pub fn from_value(v: &Value) -> Self {
        let Value::Object(map) = v else {
            return Self::default();
        };

        Self {
            title: val_string(map.get("title")),
            category: val_string(map.get("category")),
            tags: val_strings(map.get("tags")),
            image: val_string(map.get("image")),
            thumb: val_string(map.get("thumb")),
            pdf: val_string(map.get("pdf")),
            added: val_string(map.get("added")),
            age_range: val_string(map.get("ageRange")),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(FALLBACK_TITLE)
    }

    /// Thumbnail source: `thumb` when present, otherwise `image`.
    pub fn thumbnail_src(&self) -> Option<&str> {
        self.thumb.as_deref().or(self.image.as_deref())
    }

    /// Full-size image, falling back to the thumbnail.
    pub fn full_image_src(&self) -> Option<&str> {
        self.image.as_deref().or(self.thumb.as_deref())
    }

    pub fn pdf_href(&self) -> &str {
        self.pdf.as_deref().unwrap_or("")
    }

    /// Lower-cased text the search box matches against: title, category and
    /// tags joined by single spaces.
    pub fn search_haystack(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.tags.len());
        parts.push(self.title.as_deref().unwrap_or(""));
        parts.push(self.category.as_deref().unwrap_or(""));
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Parsed `added` date, or `None` when absent or unparseable.
    pub fn added_at(&self) -> Option<NaiveDateTime> {
        self.added.as_deref().and_then(parse_added)
    }
}

/// Parse an `added` value. Accepts plain dates, RFC 3339 timestamps and the
/// two common naive timestamp layouts.
pub fn parse_added(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
}

/// Decode a catalog payload.
///
/// `null` is an empty catalog; anything other than an array is `None`.
pub fn decode_catalog(payload: &Value) -> Option<Catalog> {
    match payload {
        Value::Null => Some(Arc::from(Vec::new())),
        Value::Array(items) => Some(items.iter().map(CatalogEntry::from_value).collect()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_all_fields() {
        let entry = CatalogEntry::from_value(&json!({
            "title": "Spooky Cat",
            "category": "Halloween",
            "tags": ["Halloween", "Pumpkin"],
            "image": "/img/cat.png",
            "thumb": "/img/cat-thumb.webp",
            "pdf": "/pdf/cat.pdf",
            "added": "2024-10-01",
            "ageRange": "3-8"
        }));

        assert_eq!(entry.title.as_deref(), Some("Spooky Cat"));
        assert_eq!(entry.tags, vec!["Halloween", "Pumpkin"]);
        assert_eq!(entry.age_range.as_deref(), Some("3-8"));
        assert_eq!(entry.thumbnail_src(), Some("/img/cat-thumb.webp"));
        assert_eq!(entry.full_image_src(), Some("/img/cat.png"));
    }

    #[test]
    fn test_wrong_types_degrade_to_absent() {
        let entry = CatalogEntry::from_value(&json!({
            "title": 42,
            "category": "",
            "tags": "not-a-list",
            "pdf": null
        }));

        assert_eq!(entry.display_title(), FALLBACK_TITLE);
        assert!(entry.category.is_none());
        assert!(entry.tags.is_empty());
        assert_eq!(entry.pdf_href(), "");
    }

    #[test]
    fn test_non_object_element_is_default_entry() {
        assert_eq!(CatalogEntry::from_value(&json!(7)), CatalogEntry::default());
    }

    #[test]
    fn test_thumbnail_falls_back_to_image() {
        let entry = CatalogEntry {
            image: Some("/img/full.png".into()),
            ..Default::default()
        };
        assert_eq!(entry.thumbnail_src(), Some("/img/full.png"));
    }

    #[test]
    fn test_search_haystack_joins_and_lowercases() {
        let entry = CatalogEntry {
            title: Some("Spooky Cat".into()),
            category: None,
            tags: vec!["Halloween".into(), "Pumpkin".into()],
            ..Default::default()
        };
        assert_eq!(entry.search_haystack(), "spooky cat  halloween pumpkin");
    }

    #[test]
    fn test_parse_added_formats() {
        assert!(parse_added("2024-06-01").is_some());
        assert!(parse_added("2024-06-01T10:00:00Z").is_some());
        assert!(parse_added("2024-06-01T10:00:00.123").is_some());
        assert!(parse_added("2024-06-01 10:00:00").is_some());
        assert!(parse_added("June 1st").is_none());
        assert!(parse_added("").is_none());
    }

    #[test]
    fn test_decode_catalog_shapes() {
        assert_eq!(decode_catalog(&Value::Null).map(|c| c.len()), Some(0));
        assert_eq!(decode_catalog(&json!([{}, {"title": "x"}])).map(|c| c.len()), Some(2));
        assert!(decode_catalog(&json!({"items": []})).is_none());
        assert!(decode_catalog(&json!("text")).is_none());
    }
}
