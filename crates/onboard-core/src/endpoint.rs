//! Shard endpoint resolution.
//!
//! Accounts that span several organizations are partitioned across dashboard
//! hosts ("shards"). Once the shard serving an organization is known, every
//! request for that organization goes to it instead of the default host.

use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// Base URL of the dashboard host serving one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardEndpoint {
    host: String,
    base_url: Url,
}

impl ShardEndpoint {
    /// Builds a shard endpoint for `host`, keeping the scheme and API path
    /// prefix of `default_base`.
    ///
    /// `host` may carry a port (`n42.meraki.com:8443`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the host is blank, contains a path
    /// or scheme, or does not form a valid URL.
    pub fn from_host(default_base: &Url, host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() || host.contains('/') {
            return Err(Error::InvalidEndpoint(format!(
                "Invalid shard host `{host}`"
            )));
        }

        let mut path = default_base.path().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }

        let base_url = Url::parse(&format!("{}://{host}{path}", default_base.scheme()))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid shard host `{host}`: {err}")))?;

        Ok(Self {
            host: host.to_string(),
            base_url,
        })
    }

    /// Uses `base_url` itself as the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL has no host.
    pub fn from_base_url(base_url: Url) -> Result<Self> {
        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(Error::InvalidEndpoint(format!(
                    "URL `{base_url}` has no host"
                )))
            }
        };
        Ok(Self { host, base_url })
    }

    /// Host (and optional port) serving the organization.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base URL all API paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the API resource named by `segments`, each percent-encoded as a
    /// single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] for an empty, `.` or `..` segment.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(Error::InvalidEndpoint(format!(
                "Invalid API path segment `{bad}`"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("URL `{}` cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Display for ShardEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}
