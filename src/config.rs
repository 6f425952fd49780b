use crate::cards::PresentationMode;
use crate::controller::PageLayout;
use crate::recency::DEFAULT_NEW_LIMIT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_SOURCE: &str = "https://example.com/data/coloring-sheets.json";
const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Platform directories for config, cache and logs.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "sheet-explorer", "sheet-explorer")
}

/// Runtime settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL or file path of the catalog document.
    pub data_source: String,
    /// Category preselected at startup (landing-page style).
    pub default_category: Option<String>,
    /// Size of the "new" section.
    pub new_limit: usize,
    pub presentation: PresentationMode,
    pub layout: PageLayout,
    pub download_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            default_category: None,
            new_limit: DEFAULT_NEW_LIMIT,
            presentation: PresentationMode::Classic,
            layout: PageLayout::default(),
            download_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `explicit`, or from the platform config dir when `None`.
    ///
    /// A missing file at the default location yields defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where `d` and `download` put PDFs.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| directories::UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.new_limit, 8);
        assert_eq!(settings.presentation, PresentationMode::Classic);
        assert!(settings.layout.grid);
        assert!(settings.default_category.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"default_category": "Christmas", "presentation": "gallery", "layout": {{"new_grid": false}}}}"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.default_category.as_deref(), Some("Christmas"));
        assert_eq!(settings.presentation, PresentationMode::Gallery);
        assert!(!settings.layout.new_grid);
        assert!(settings.layout.grid);
        assert_eq!(settings.data_source, DEFAULT_DATA_SOURCE);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Settings::load(Some(file.path())), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Settings::load(Some(&missing)), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_explicit_download_dir_wins() {
        let settings = Settings {
            download_dir: Some(PathBuf::from("/tmp/sheets")),
            ..Default::default()
        };
        assert_eq!(settings.resolved_download_dir(), PathBuf::from("/tmp/sheets"));
    }
}
