//! Network provisioning.

use crate::api::DashboardApi;
use crate::classify::DeviceMix;
use crate::entities::resolve_network_id;
use onboard_core::ids::{NetworkId, OrganizationId};
use onboard_core::{Error, Lookup, Result, ShardEndpoint};
use onboard_dashboard::CreateNetworkRequest;
use tracing::{info, warn};

/// Legacy type label standing for every product family.
pub const COMBINED_NETWORK_TYPE: &str = "combined";

/// Type label that cannot be created by an onboarding run.
pub const SYSTEMS_MANAGER_NETWORK_TYPE: &str = "systems manager";

/// Network type carrying every product family.
pub const ALL_PRODUCT_TYPES: &str = "wireless switch appliance";

/// Desired network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    /// Network name.
    pub name: String,
    /// Time zone.
    pub time_zone: String,
    /// Space-separated tags.
    pub tags: String,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Type label, normally derived from `device_mix`.
    pub network_type: String,
    /// Families present among the devices to enroll.
    pub device_mix: DeviceMix,
}

impl NetworkSpec {
    /// Network whose type is derived from `device_mix`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        time_zone: impl Into<String>,
        organization_id: OrganizationId,
        device_mix: DeviceMix,
    ) -> Self {
        Self {
            name: name.into(),
            time_zone: time_zone.into(),
            tags: String::new(),
            organization_id,
            network_type: device_mix.network_type(),
            device_mix,
        }
    }

    /// Set tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Override the type label.
    #[must_use]
    pub fn with_network_type(mut self, network_type: impl Into<String>) -> Self {
        self.network_type = network_type.into();
        self
    }

    /// Type to send on creation, or `None` if this type cannot be created.
    #[must_use]
    pub fn creation_type(&self) -> Option<String> {
        match self.network_type.as_str() {
            SYSTEMS_MANAGER_NETWORK_TYPE => None,
            COMBINED_NETWORK_TYPE if self.device_mix.is_empty() => {
                Some(ALL_PRODUCT_TYPES.to_string())
            }
            COMBINED_NETWORK_TYPE => Some(self.device_mix.network_type()),
            other => Some(other.to_string()),
        }
    }

    fn to_request(&self, network_type: String) -> CreateNetworkRequest {
        CreateNetworkRequest {
            name: self.name.clone(),
            time_zone: self.time_zone.clone(),
            tags: self.tags.clone(),
            organization_id: self.organization_id.clone(),
            network_type,
        }
    }
}

/// Result of [`ensure_network`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// The network was created.
    Created(NetworkId),
    /// An existing network was reused.
    Reused(NetworkId),
    /// Creation was skipped; no network is available.
    Skipped {
        /// Why creation was skipped.
        reason: String,
    },
}

impl Provisioned {
    /// The network id, unless creation was skipped.
    #[must_use]
    pub const fn network_id(&self) -> Option<&NetworkId> {
        match self {
            Self::Created(id) | Self::Reused(id) => Some(id),
            Self::Skipped { .. } => None,
        }
    }
}

/// Makes sure a network named `spec.name` exists.
///
/// An existing network is an error unless `ignore_existing` is set, in which
/// case it is reused untouched. A failed listing counts as absence. A created
/// network is looked up again so the returned id is the one the dashboard
/// reports.
///
/// # Errors
///
/// [`Error::AlreadyExists`], [`Error::Upstream`] if creation was rejected, or
/// [`Error::CreationVerificationFailed`] if the new network cannot be found.
pub async fn ensure_network(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    spec: &NetworkSpec,
    ignore_existing: bool,
) -> Result<Provisioned> {
    if let Some(id) = existing_network(api, shard, org, &spec.name).await {
        if !ignore_existing {
            return Err(Error::AlreadyExists(spec.name.clone()));
        }
        info!(network = %spec.name, network_id = %id, "reusing existing network");
        return Ok(Provisioned::Reused(id));
    }

    let Some(network_type) = spec.creation_type() else {
        let reason = format!(
            "network type `{}` cannot be created; skipping creation of `{}`",
            spec.network_type, spec.name
        );
        warn!(network = %spec.name, "{reason}");
        return Ok(Provisioned::Skipped { reason });
    };

    info!(network = %spec.name, network_type = %network_type, "creating network");
    api.create_network(shard, org, &spec.to_request(network_type))
        .await
        .map_err(|err| Error::upstream("create network", &err))?;

    match resolve_network_id(api, shard, org, &spec.name).await.found() {
        Some(id) => {
            info!(network = %spec.name, network_id = %id, "created network");
            Ok(Provisioned::Created(id))
        }
        None => Err(Error::CreationVerificationFailed(spec.name.clone())),
    }
}

/// Network existence check where a failed listing counts as absence.
pub async fn existing_network(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    name: &str,
) -> Option<NetworkId> {
    match resolve_network_id(api, shard, org, name).await {
        Lookup::Found(id) => Some(id),
        Lookup::Absent => None,
        Lookup::Failed(err) => {
            warn!(
                network = name,
                error = %err,
                "network listing failed; assuming the network does not exist"
            );
            None
        }
    }
}
