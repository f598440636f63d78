//! Asynchronous dashboard API client implementation.

use crate::models::{
    BindRequest, ClaimRequest, ConfigTemplate, CreateNetworkRequest, DeviceUpdate,
    InventoryDevice, Network, NetworkClaimRequest, NetworkDevice, Organization, OrganizationSnmp,
};
use crate::Result;
use onboard_core::client::{ClientConfig, DEFAULT_POOL_IDLE_TIMEOUT, DEFAULT_POOL_MAX_IDLE_PER_HOST};
use onboard_core::ids::{NetworkId, OrganizationId, Serial};
use onboard_core::{Error, ShardEndpoint};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("onboard-dashboard/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";

/// Builder for [`DashboardClient`].
#[derive(Debug, Clone)]
pub struct DashboardClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    api_key: Option<SecretString>,
}

impl DashboardClientBuilder {
    /// Create a new builder from the provided base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut raw = base_url.as_ref().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid dashboard base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            api_key: None,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure the API key sent in the `X-Cisco-Meraki-API-Key` header.
    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Build the client instance.
    pub fn build(self) -> Result<DashboardClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT))
            .pool_max_idle_per_host(DEFAULT_POOL_MAX_IDLE_PER_HOST)
            .connect_timeout(self.http_config.connect_timeout);

        if let Some(timeout) = self.http_config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build dashboard HTTP client: {err}"))
        })?;

        let default_endpoint = ShardEndpoint::from_base_url(self.base_url)?;

        Ok(DashboardClient {
            http,
            default_endpoint,
            api_key: self.api_key,
        })
    }
}

/// Asynchronous client for the dashboard management API.
///
/// Organization-independent calls go to the configured base URL; every other
/// call takes the [`ShardEndpoint`] serving the organization.
#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    default_endpoint: ShardEndpoint,
    api_key: Option<SecretString>,
}

impl DashboardClient {
    /// Endpoint for the shard host `host`, sharing this client's scheme and API prefix.
    pub fn shard(&self, host: &str) -> Result<ShardEndpoint> {
        ShardEndpoint::from_host(self.default_endpoint.base_url(), host)
    }

    /// List organizations visible to the API key.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.get_json(&self.default_endpoint, &["organizations"]).await
    }

    /// Fetch organization SNMP settings, which name the serving shard host.
    pub async fn get_organization_snmp(&self, org: &OrganizationId) -> Result<OrganizationSnmp> {
        self.get_json(&self.default_endpoint, &["organizations", org.as_str(), "snmp"])
            .await
    }

    /// List networks in an organization.
    pub async fn list_networks(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<Network>> {
        self.get_json(shard, &["organizations", org.as_str(), "networks"])
            .await
    }

    /// Create a network.
    pub async fn create_network(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &CreateNetworkRequest,
    ) -> Result<()> {
        let path = ["organizations", org.as_str(), "networks"];
        self.send_empty(shard, Method::POST, &path, Some(request))
            .await
    }

    /// List configuration templates in an organization.
    pub async fn list_config_templates(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<ConfigTemplate>> {
        self.get_json(shard, &["organizations", org.as_str(), "configTemplates"])
            .await
    }

    /// List the organization device inventory.
    pub async fn list_inventory(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<InventoryDevice>> {
        self.get_json(shard, &["organizations", org.as_str(), "inventory"])
            .await
    }

    /// Claim a device or license key into an organization.
    pub async fn claim_into_organization(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &ClaimRequest,
    ) -> Result<()> {
        let path = ["organizations", org.as_str(), "claim"];
        self.send_empty(shard, Method::POST, &path, Some(request))
            .await
    }

    /// Claim a device into a network.
    pub async fn claim_into_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<()> {
        let path = ["networks", network.as_str(), "devices", "claim"];
        let request = NetworkClaimRequest {
            serial: serial.clone(),
        };
        self.send_empty(shard, Method::POST, &path, Some(&request))
            .await
    }

    /// Fetch a device within a network.
    pub async fn get_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<NetworkDevice> {
        let path = ["networks", network.as_str(), "devices", serial.as_str()];
        self.get_json(shard, &path).await
    }

    /// Update fields of a device within a network.
    pub async fn update_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
        update: &DeviceUpdate,
    ) -> Result<()> {
        let path = ["networks", network.as_str(), "devices", serial.as_str()];
        self.send_empty(shard, Method::PUT, &path, Some(update))
            .await
    }

    /// Bind a network to a configuration template.
    pub async fn bind_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        request: &BindRequest,
    ) -> Result<()> {
        let path = ["networks", network.as_str(), "bind"];
        self.send_empty(shard, Method::POST, &path, Some(request))
            .await
    }

    async fn get_json<T>(&self, endpoint: &ShardEndpoint, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(endpoint, Method::GET, segments, None)
            .await
    }

    async fn send_empty<B>(
        &self,
        endpoint: &ShardEndpoint,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json::<B, serde_json::Value>(endpoint, method, segments, body)
            .await
            .map(|_| ())
    }

    async fn send_json<B, R>(
        &self,
        endpoint: &ShardEndpoint,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = endpoint.url_for(segments)?;
        let path = url.path().to_string();
        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        info!(%method, host = endpoint.host(), path = %path, "dashboard request");

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::HttpError(format!("Failed to read dashboard response body: {err}"))
        })?;
        debug!(%status, len = bytes.len(), path = %path, "dashboard response");

        if status.is_success() {
            return deserialize_body(&path, status, &bytes);
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        Err(match status {
            StatusCode::NOT_FOUND => Error::NotFound(format!("{path}: {text}")),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Error::InvalidRequest(format!("dashboard authentication failed: {text}"))
            }
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Error::ServiceUnavailable(format!(
                "dashboard temporarily unavailable: {text}"
            )),
            status if status.is_server_error() => {
                Error::ServiceUnavailable(format!("dashboard server error {status}: {text}"))
            }
            _ => Error::HttpError(format!("dashboard error {status}: {text}")),
        })
    }
}

fn deserialize_body<R>(path: &str, status: StatusCode, bytes: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        serde_json::from_value(serde_json::Value::Null).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse empty dashboard response for `{path}`: {err}"
            ))
        })
    } else {
        serde_json::from_slice(bytes).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse dashboard response for `{path}`: {err}"
            ))
        })
    }
}
