//! Resource resolution and retrieval for image sources.
//!
//! A `src` value resolves to one of two resource shapes:
//!
//! - **Remote**: `http(s)://` URLs, fetched with the async HTTP client and
//!   an XML accept hint
//! - **Local**: site-root paths (`/icons/logo.svg`) resolved against the
//!   site root, and file-relative paths resolved against the page's own
//!   directory, read from disk
//!
//! Other schemes (`data:`, `mailto:`) and bare fragments do not resolve.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

use crate::config::InlayConfig;
use crate::core::LinkKind;

/// Accept header sent for remote image sources.
const ACCEPT_XML: &str = "image/svg+xml, text/xml, application/xml";

/// Why a single resource could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for `{url}` failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{url}` answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remote fetches are disabled")]
    RemoteDisabled,

    #[error("cannot resolve `{0}`")]
    Unresolvable(String),
}

/// Where a `src` value points after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Remote(String),
    Local(PathBuf),
}

impl Resource {
    /// Display form for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Resolves and retrieves image sources.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    site_root: PathBuf,
    remote: bool,
}

impl Fetcher {
    pub fn new(config: &InlayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.fetch.user_agent.clone())
            .timeout(Duration::from_secs(config.fetch.timeout))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            site_root: config.pages_dir(),
            remote: config.fetch.remote,
        })
    }

    /// Check whether remote fetching is enabled.
    pub fn remote_enabled(&self) -> bool {
        self.remote
    }

    /// Resolve a `src` attribute value relative to the page that holds it.
    pub fn resolve(&self, src: &str, page_dir: &Path) -> Result<Resource, FetchError> {
        match LinkKind::parse(src) {
            LinkKind::External(link) => {
                if !LinkKind::is_http(link) {
                    return Err(FetchError::Unresolvable(src.to_string()));
                }
                let url =
                    Url::parse(link).map_err(|_| FetchError::Unresolvable(src.to_string()))?;
                Ok(Resource::Remote(url.to_string()))
            }
            LinkKind::SiteRoot(path) => {
                let trimmed = strip_query(path).trim_start_matches('/');
                Ok(Resource::Local(self.site_root.join(decode(trimmed))))
            }
            LinkKind::FileRelative(path) => {
                Ok(Resource::Local(page_dir.join(decode(strip_query(path)))))
            }
            LinkKind::Fragment(_) => Err(FetchError::Unresolvable(src.to_string())),
        }
    }

    /// Fetch the resource body, requesting XML interpretation for remote URLs.
    pub async fn fetch(&self, resource: &Resource) -> Result<String, FetchError> {
        match resource {
            Resource::Remote(url) => {
                if !self.remote {
                    return Err(FetchError::RemoteDisabled);
                }
                let response = self
                    .client
                    .get(url.as_str())
                    .header(reqwest::header::ACCEPT, ACCEPT_XML)
                    .send()
                    .await
                    .map_err(|source| FetchError::Http {
                        url: url.clone(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.clone(),
                        status,
                    });
                }

                response.text().await.map_err(|source| FetchError::Http {
                    url: url.clone(),
                    source,
                })
            }
            Resource::Local(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Drop query string and fragment from a path-like src value.
fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Percent-decode a path component.
fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(root: &Path) -> Fetcher {
        let mut config = InlayConfig::default();
        config.root = root.to_path_buf();
        Fetcher::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_site_root() {
        let fetcher = fetcher(Path::new("/site"));
        let resource = fetcher
            .resolve("/icons/logo.svg", Path::new("/site/posts"))
            .unwrap();
        assert_eq!(
            resource,
            Resource::Local(PathBuf::from("/site/icons/logo.svg"))
        );
    }

    #[test]
    fn test_resolve_file_relative() {
        let fetcher = fetcher(Path::new("/site"));
        let resource = fetcher
            .resolve("./logo.svg", Path::new("/site/posts"))
            .unwrap();
        assert_eq!(
            resource,
            Resource::Local(PathBuf::from("/site/posts/./logo.svg"))
        );
    }

    #[test]
    fn test_resolve_remote() {
        let fetcher = fetcher(Path::new("/site"));
        let resource = fetcher
            .resolve("https://example.com/icon.svg", Path::new("/site"))
            .unwrap();
        assert!(matches!(resource, Resource::Remote(url) if url.contains("example.com")));
    }

    #[test]
    fn test_resolve_rejects_other_schemes() {
        let fetcher = fetcher(Path::new("/site"));
        assert!(matches!(
            fetcher.resolve("data:image/svg+xml,<svg/>", Path::new("/site")),
            Err(FetchError::Unresolvable(_))
        ));
        assert!(matches!(
            fetcher.resolve("#fragment", Path::new("/site")),
            Err(FetchError::Unresolvable(_))
        ));
    }

    #[test]
    fn test_resolve_strips_query_and_decodes() {
        let fetcher = fetcher(Path::new("/site"));
        let resource = fetcher
            .resolve("/icons/my%20logo.svg?v=2", Path::new("/site"))
            .unwrap();
        assert_eq!(
            resource,
            Resource::Local(PathBuf::from("/site/icons/my logo.svg"))
        );
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("icon.svg"), "<svg/>").unwrap();

        let fetcher = fetcher(dir.path());
        let resource = Resource::Local(dir.path().join("icon.svg"));
        assert_eq!(fetcher.fetch(&resource).await.unwrap(), "<svg/>");
    }

    #[tokio::test]
    async fn test_fetch_missing_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(dir.path());
        let resource = Resource::Local(dir.path().join("absent.svg"));
        assert!(matches!(
            fetcher.fetch(&resource).await,
            Err(FetchError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_remote_disabled() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = InlayConfig::default();
        config.root = dir.path().to_path_buf();
        config.fetch.remote = false;
        let fetcher = Fetcher::new(&config).unwrap();

        let resource = Resource::Remote("https://example.com/icon.svg".to_string());
        assert!(matches!(
            fetcher.fetch(&resource).await,
            Err(FetchError::RemoteDisabled)
        ));
    }
}
