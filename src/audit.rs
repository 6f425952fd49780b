use crate::catalog::CatalogEntry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const THUMB_SUFFIX: &str = "-thumb.webp";

/// A problem with one catalog entry's assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    MissingTitle,
    MissingPdf,
    MissingImage,
    /// No `thumb` declared; `expected` is the conventional thumbnail path.
    MissingThumb { expected: String },
    /// The thumbnail is referenced but absent under the assets root.
    ThumbFileMissing { path: PathBuf },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "missing title"),
            Self::MissingPdf => write!(f, "missing pdf"),
            Self::MissingImage => write!(f, "missing image"),
            Self::MissingThumb { expected } => write!(f, "missing thumb (expected {expected})"),
            Self::ThumbFileMissing { path } => write!(f, "thumbnail file not found: {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub index: usize,
    pub title: String,
    pub findings: Vec<Finding>,
}

/// Branding images never get thumbnails.
pub fn is_logo_image(path: &str) -> bool {
    path.to_lowercase().contains("logo")
}

/// `dir/name.ext` becomes `dir/name-thumb.webp`.
pub fn expected_thumb(image: &str) -> String {
    let (dir, file) = match image.rfind('/') {
        Some(i) => image.split_at(i + 1),
        None => ("", image),
    };
    let stem = match file.rfind('.') {
        Some(0) | None => file,
        Some(i) => &file[..i],
    };
    format!("{dir}{stem}{THUMB_SUFFIX}")
}

/// Map a site path onto the local assets tree.
fn asset_path(root: &Path, site_path: &str) -> PathBuf {
    root.join(site_path.trim_start_matches('/'))
}

fn audit_entry(entry: &CatalogEntry, assets: Option<&Path>) -> Vec<Finding> {
    let mut findings = Vec::new();
    if entry.title.is_none() {
        findings.push(Finding::MissingTitle);
    }
    if entry.pdf.is_none() {
        findings.push(Finding::MissingPdf);
    }

    let image = entry.image.as_deref();
    if image.is_none() {
        findings.push(Finding::MissingImage);
    }

    let thumb = match (entry.thumb.as_deref(), image) {
        (Some(thumb), _) => Some(thumb.to_string()),
        (None, Some(image)) if !is_logo_image(image) => {
            let expected = expected_thumb(image);
            findings.push(Finding::MissingThumb {
                expected: expected.clone(),
            });
            Some(expected)
        }
        _ => None,
    };

    if let (Some(root), Some(thumb)) = (assets, thumb) {
        let path = asset_path(root, &thumb);
        if !path.exists() {
            findings.push(Finding::ThumbFileMissing { path });
        }
    }
    findings
}

/// Entries with at least one finding, in catalog order.
pub fn audit(entries: &[CatalogEntry], assets: Option<&Path>) -> Vec<EntryReport> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let findings = audit_entry(entry, assets);
            (!findings.is_empty()).then(|| EntryReport {
                index,
                title: entry.display_title().to_string(),
                findings,
            })
        })
        .collect()
}
