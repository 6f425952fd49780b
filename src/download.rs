use crate::loader::CatalogSource;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

const FALLBACK_FILE_NAME: &str = "coloring-page.pdf";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Entry has no PDF link")]
    MissingPdf,

    #[error("Cannot resolve link {href:?} against {base}")]
    Unresolvable { href: String, base: String },

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Download failed: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Progress bar template error: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

/// Resolve a card link against the catalog source. Absolute URLs pass
/// through; relative ones need a URL source to join against.
pub fn resolve_link(source: &CatalogSource, href: &str) -> Result<Url, DownloadError> {
    if href.is_empty() {
        return Err(DownloadError::MissingPdf);
    }
    if let Ok(url) = Url::parse(href) {
        return Ok(url);
    }
    match source {
        CatalogSource::Url(base) => base.join(href).map_err(|_| DownloadError::Unresolvable {
            href: href.to_string(),
            base: source.to_string(),
        }),
        CatalogSource::File(_) => Err(DownloadError::Unresolvable {
            href: href.to_string(),
            base: source.to_string(),
        }),
    }
}

/// Last non-empty path segment of `url`.
pub fn file_name_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Stream `url` into `dir`. With `show_progress` a bar is drawn on stderr.
pub async fn download_pdf(url: &Url, dir: &Path, show_progress: bool) -> Result<PathBuf, DownloadError> {
    tokio::fs::create_dir_all(dir).await?;
    let output = dir.join(file_name_for(url));
    tracing::info!(%url, output = %output.display(), "downloading pdf");

    let response = reqwest::get(url.clone()).await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let pb = if !show_progress {
        ProgressBar::hidden()
    } else if let Some(total) = response.content_length() {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::new_spinner()
    };

    let mut file = tokio::fs::File::create(&output).await?;
    let mut stream = response.bytes_stream();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        file.write_all(&chunk).await?;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;

    pb.finish_with_message("Download complete");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_source() -> CatalogSource {
        CatalogSource::parse("https://example.com/data/coloring-sheets.json").unwrap()
    }

    #[test]
    fn test_resolve_site_relative_and_relative() {
        let source = url_source();
        assert_eq!(
            resolve_link(&source, "/pdf/cat.pdf").unwrap().as_str(),
            "https://example.com/pdf/cat.pdf"
        );
        assert_eq!(
            resolve_link(&source, "cat.pdf").unwrap().as_str(),
            "https://example.com/data/cat.pdf"
        );
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let source = CatalogSource::File(PathBuf::from("catalog.json"));
        assert_eq!(
            resolve_link(&source, "https://cdn.example.org/a.pdf").unwrap().as_str(),
            "https://cdn.example.org/a.pdf"
        );
        assert!(matches!(
            resolve_link(&source, "/pdf/a.pdf"),
            Err(DownloadError::Unresolvable { .. })
        ));
        assert!(matches!(resolve_link(&source, ""), Err(DownloadError::MissingPdf)));
    }

    #[test]
    fn test_file_name_for() {
        let url = Url::parse("https://example.com/pdf/spooky-cat.pdf").unwrap();
        assert_eq!(file_name_for(&url), "spooky-cat.pdf");
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(file_name_for(&url), FALLBACK_FILE_NAME);
    }
}
