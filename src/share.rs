//! Share links: absolute `/share/<token>` URLs and the clipboard they go to.

use async_trait::async_trait;
use log::info;
use url::Url;

use crate::codec::{self, ShareToken};
use crate::document::Document;
use crate::{Error, Result};

/// Path segment that precedes the token in share URLs.
pub const SHARE_ROUTE: &str = "share";

/// System clipboard capability.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    ///
    /// Refusals are reported as [`Error::PublishClipboardDenied`].
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// A published link, ready to show or open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    pub url: Url,
    pub token: ShareToken,
}

#[derive(Debug, Clone)]
pub struct ShareLinkPublisher {
    origin: Url,
}

impl ShareLinkPublisher {
    /// `origin` must be an absolute http(s) URL; any path on it is ignored.
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            origin: parse_origin(origin)?,
        })
    }

    pub fn origin(&self) -> &str {
        self.origin.as_str().trim_end_matches('/')
    }

    /// Build the share URL for `document` without touching the clipboard.
    pub fn share_url(&self, document: &Document) -> Result<SharedLink> {
        let token = codec::encode(document)?;
        let raw = format!("{}/{}/{}", self.origin(), SHARE_ROUTE, token);
        let url = Url::parse(&raw).map_err(|e| Error::EncodeFailed(format!("invalid share URL {}: {}", raw, e)))?;
        Ok(SharedLink { url, token })
    }

    /// Build the share URL and copy it to the clipboard.
    pub async fn publish(&self, document: &Document, clipboard: &dyn Clipboard) -> Result<SharedLink> {
        let link = self.share_url(document)?;
        clipboard.write_text(link.url.as_str()).await?;
        info!("Copied share link ({} byte token) to the clipboard", link.token.as_str().len());
        Ok(link)
    }
}

fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin.trim())
        .map_err(|e| Error::ConfigError(format!("invalid share origin '{}': {}", origin, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::ConfigError(format!(
            "share origin must be an http(s) URL with a host, got '{}'",
            origin
        )));
    }
    Url::parse(&url.origin().ascii_serialization())
        .map_err(|e| Error::ConfigError(format!("invalid share origin '{}': {}", origin, e)))
}

/// Extract the token from a share URL or path: the last non-empty path
/// segment, whatever prefix, query or fragment surrounds it.
pub fn token_from_route(route: &str) -> Option<&str> {
    let route = route.trim();
    let path = match route.find("://") {
        Some(scheme_end) => {
            let rest = &route[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("")
        }
        None => route,
    };
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.split('/').rev().find(|segment| !segment.is_empty())
}
