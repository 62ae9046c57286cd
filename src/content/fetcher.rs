//! Content fetcher - retrieves document text by location
//!
//! A location is an opaque string: an absolute `http(s)://` URL, or a path.
//! Paths are fetched over HTTP when a base URL is configured, otherwise they
//! are read from the docs directory (with the mount prefix stripped).

use percent_encoding::percent_decode_str;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::DocumentError;
use crate::config::SiteConfig;

/// Something that can turn a location into document text.
pub trait DocumentSource {
    /// Issue exactly one request for `location`.
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, DocumentError>> + Send;
}

/// Fetches documents over HTTP
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create an HTTP source, optionally bounded by a request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self, DocumentError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<String, DocumentError> {
        let response = self.client.get(location).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} -> {}", location, status);
            return Err(DocumentError::Load {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Reads documents from a directory on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    mount: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(root: P, mount: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            mount: mount.trim_end_matches('/').to_string(),
        }
    }

    /// Map a location onto a file under the root, refusing anything that
    /// climbs out of it.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, DocumentError> {
        let relative = match location.strip_prefix(&self.mount) {
            Some(rest) if !self.mount.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest
            }
            _ => location,
        };
        let relative = relative.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(relative.trim_start_matches('/'))
            .decode_utf8()
            .map_err(|e| DocumentError::runtime(format!("invalid document location: {}", e)))?;

        let mut resolved = self.root.clone();
        for component in Path::new(decoded.as_ref()).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(DocumentError::runtime(format!(
                        "location escapes the document root: {}",
                        location
                    )))
                }
            }
        }
        Ok(resolved)
    }
}

impl DocumentSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<String, DocumentError> {
        let path = self.resolve(location)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Document not found: {:?}", path);
                Err(DocumentError::Load { status: 404 })
            }
            Err(e) => Err(DocumentError::runtime(e.to_string())),
        }
    }
}

/// Where a given location will be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Http(String),
    File(String),
}

/// Routes each location to the HTTP or file source
#[derive(Clone)]
pub struct Fetcher {
    http: HttpSource,
    files: FileSource,
    base_url: Option<String>,
}

impl Fetcher {
    /// Build a fetcher from site configuration
    pub fn new<P: AsRef<Path>>(config: &SiteConfig, docs_dir: P) -> Result<Self, DocumentError> {
        let timeout = config.viewer.timeout_secs.map(Duration::from_secs);
        Ok(Self {
            http: HttpSource::new(timeout)?,
            files: FileSource::new(docs_dir, &config.viewer.mount),
            base_url: config.viewer.base_url.clone(),
        })
    }

    /// Decide which source serves `location`
    pub fn route(&self, location: &str) -> Route {
        if is_absolute_url(location) {
            return Route::Http(location.to_string());
        }
        match &self.base_url {
            Some(base) => Route::Http(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                location.trim_start_matches('/')
            )),
            None => Route::File(location.to_string()),
        }
    }
}

impl DocumentSource for Fetcher {
    async fn fetch(&self, location: &str) -> Result<String, DocumentError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(DocumentError::runtime("document location is empty"));
        }

        tracing::debug!("Fetching document: {}", location);
        match self.route(location) {
            Route::Http(url) => self.http.fetch(&url).await,
            Route::File(path) => self.files.fetch(&path).await,
        }
    }
}

fn is_absolute_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
