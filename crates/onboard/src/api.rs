//! The dashboard calls an onboarding run depends on.
//!
//! Stages talk to the dashboard only through [`DashboardApi`], so they can be
//! exercised against mocks as well as the real HTTP client.

use async_trait::async_trait;
use onboard_core::ids::{NetworkId, OrganizationId, Serial};
use onboard_core::{Result, ShardEndpoint};
use onboard_dashboard::{
    BindRequest, ClaimRequest, ConfigTemplate, CreateNetworkRequest, DashboardClient, DeviceUpdate,
    InventoryDevice, Network, NetworkDevice, Organization, OrganizationSnmp,
};

/// Narrow view of the dashboard management API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Endpoint for the shard host serving an organization.
    fn shard_for_host(&self, host: &str) -> Result<ShardEndpoint>;

    /// List organizations visible to the credential.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// Organization SNMP settings, which name the serving shard host.
    async fn organization_snmp(&self, org: &OrganizationId) -> Result<OrganizationSnmp>;

    /// List networks in an organization.
    async fn list_networks(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<Network>>;

    /// Create a network.
    async fn create_network(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &CreateNetworkRequest,
    ) -> Result<()>;

    /// List configuration templates in an organization.
    async fn list_config_templates(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<ConfigTemplate>>;

    /// List the organization inventory.
    async fn list_inventory(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<InventoryDevice>>;

    /// Claim a device or license key into an organization.
    async fn claim_into_organization(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &ClaimRequest,
    ) -> Result<()>;

    /// Claim a device into a network.
    async fn claim_into_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<()>;

    /// Fetch a device within a network.
    async fn get_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<NetworkDevice>;

    /// Update a device within a network.
    async fn update_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
        update: &DeviceUpdate,
    ) -> Result<()>;

    /// Bind a network to a configuration template.
    async fn bind_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        request: &BindRequest,
    ) -> Result<()>;
}

#[async_trait]
impl DashboardApi for DashboardClient {
    fn shard_for_host(&self, host: &str) -> Result<ShardEndpoint> {
        self.shard(host)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        DashboardClient::list_organizations(self).await
    }

    async fn organization_snmp(&self, org: &OrganizationId) -> Result<OrganizationSnmp> {
        self.get_organization_snmp(org).await
    }

    async fn list_networks(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<Network>> {
        DashboardClient::list_networks(self, shard, org).await
    }

    async fn create_network(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &CreateNetworkRequest,
    ) -> Result<()> {
        DashboardClient::create_network(self, shard, org, request).await
    }

    async fn list_config_templates(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<ConfigTemplate>> {
        DashboardClient::list_config_templates(self, shard, org).await
    }

    async fn list_inventory(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
    ) -> Result<Vec<InventoryDevice>> {
        DashboardClient::list_inventory(self, shard, org).await
    }

    async fn claim_into_organization(
        &self,
        shard: &ShardEndpoint,
        org: &OrganizationId,
        request: &ClaimRequest,
    ) -> Result<()> {
        DashboardClient::claim_into_organization(self, shard, org, request).await
    }

    async fn claim_into_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<()> {
        DashboardClient::claim_into_network(self, shard, network, serial).await
    }

    async fn get_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
    ) -> Result<NetworkDevice> {
        DashboardClient::get_network_device(self, shard, network, serial).await
    }

    async fn update_network_device(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        serial: &Serial,
        update: &DeviceUpdate,
    ) -> Result<()> {
        DashboardClient::update_network_device(self, shard, network, serial, update).await
    }

    async fn bind_network(
        &self,
        shard: &ShardEndpoint,
        network: &NetworkId,
        request: &BindRequest,
    ) -> Result<()> {
        DashboardClient::bind_network(self, shard, network, request).await
    }
}
