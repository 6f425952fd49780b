use crate::catalog::{Catalog, decode_catalog};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown in place of the grid when the catalog cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading coloring sheets. Please try again later.";

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(reqwest::Url),
    File(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` values are URLs, everything else is a path.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            reqwest::Url::parse(raw)
                .map(Self::Url)
                .map_err(|e| LoadError::InvalidSource(format!("{raw}: {e}")))
        } else {
            Ok(Self::File(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid catalog source: {0}")]
    InvalidSource(String),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog request failed: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog payload is not a JSON array")]
    NotAnArray,
}

impl LoadError {
    /// The single message users see for any load failure.
    pub fn user_message(&self) -> &'static str {
        LOAD_ERROR_MESSAGE
    }
}

/// One-shot catalog fetcher. `load` consumes the loader, so a catalog is
/// fetched at most once per loader.
pub struct Loader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl Loader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub async fn load(self) -> Result<Catalog, LoadError> {
        tracing::info!(source = %self.source, "loading catalog");

        let body = match &self.source {
            CatalogSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                response.bytes().await?.to_vec()
            }
            CatalogSource::File(path) => tokio::fs::read(path).await?,
        };

        let catalog = parse_payload(&body)?;
        tracing::info!(entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Decode a raw catalog body. An empty body is an empty catalog.
pub fn parse_payload(body: &[u8]) -> Result<Catalog, LoadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Catalog::from(Vec::new()));
    }
    let value: serde_json::Value = serde_json::from_slice(body)?;
    decode_catalog(&value).ok_or(LoadError::NotAnArray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            CatalogSource::parse("https://example.com/data/coloring-sheets.json"),
            Ok(CatalogSource::Url(_))
        ));
        assert_eq!(
            CatalogSource::parse("data/coloring-sheets.json").unwrap(),
            CatalogSource::File(PathBuf::from("data/coloring-sheets.json"))
        );
        assert!(matches!(
            CatalogSource::parse("http://exa mple.com"),
            Err(LoadError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_parse_payload_variants() {
        assert_eq!(parse_payload(b"").unwrap().len(), 0);
        assert_eq!(parse_payload(b"  \n").unwrap().len(), 0);
        assert_eq!(parse_payload(b"null").unwrap().len(), 0);
        assert_eq!(parse_payload(br#"[{"title":"A"},{"title":"B"}]"#).unwrap().len(), 2);
        assert!(matches!(parse_payload(br#"{"title":"A"}"#), Err(LoadError::NotAnArray)));
        assert!(matches!(parse_payload(b"[{"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_one_malformed_entry_keeps_the_rest() {
        let catalog = parse_payload(br#"[{"title": 3, "tags": {}}, {"title": "Cat", "category": "Animals"}]"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].display_title(), "Cat");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let file = temp_catalog(r#"[{"title":"Cat","category":"Animals","pdf":"/pdf/cat.pdf"}]"#);
        let loader = Loader::new(CatalogSource::File(file.path().to_path_buf()));
        let catalog = loader.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].category.as_deref(), Some("Animals"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(CatalogSource::File(dir.path().join("missing.json")));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert_eq!(err.user_message(), LOAD_ERROR_MESSAGE);
    }

    /// Answer a single request on a local port with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> reqwest::Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        reqwest::Url::parse(&format!("http://{addr}/data/coloring-sheets.json")).unwrap()
    }

    fn direct_loader(url: reqwest::Url) -> Loader {
        Loader {
            source: CatalogSource::Url(url),
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let url = serve_once("200 OK", r#"[{"title":"Cat","category":"Animals"},{"title":"Dog"}]"#).await;
        let catalog = direct_loader(url).load().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].category.as_deref(), Some("Animals"));
        assert_eq!(catalog[1].display_title(), "Dog");
    }

    #[tokio::test]
    async fn test_http_error_status_fails_load() {
        let url = serve_once("404 Not Found", "not here").await;
        let err = direct_loader(url.clone()).load().await.unwrap_err();
        match &err {
            LoadError::Status { status, url: failed } => {
                assert_eq!(*status, 404);
                assert_eq!(failed, url.as_str());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut controller = crate::controller::CatalogController::new(&crate::config::Settings::default());
        controller.finish_load(Err(err));
        assert_eq!(controller.state(), crate::controller::LoadState::Failed);
        assert!(controller.catalog().is_empty());
    }

    #[test]
    fn test_status_error_display() {
        let err = LoadError::Status {
            status: 404,
            url: "https://example.com/data/coloring-sheets.json".into(),
        };
        assert!(err.to_string().contains("HTTP 404"));
        assert_eq!(err.user_message(), LOAD_ERROR_MESSAGE);
    }
}
