//! Network and template lookup by name.

use crate::api::DashboardApi;
use onboard_core::ids::{NetworkId, OrganizationId, TemplateId};
use onboard_core::{Lookup, Result, ShardEndpoint};
use onboard_dashboard::{ConfigTemplate, Network};
use tracing::debug;

/// Resolves a network by exact name.
///
/// Absence is an expected outcome; a failed listing is reported separately so
/// callers can choose how to treat it.
pub async fn resolve_network_id(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    name: &str,
) -> Lookup<NetworkId> {
    let listing = api.list_networks(shard, org).await;
    let lookup = Lookup::scan(listing, |network: Network| {
        (network.name == name).then_some(network.id)
    });
    debug!(name, found = lookup.is_found(), "network lookup");
    lookup
}

/// Resolves a configuration template by exact name.
///
/// # Errors
///
/// [`onboard_core::Error::NotFound`] if no template carries the name,
/// [`onboard_core::Error::Upstream`] if the listing failed.
pub async fn resolve_template_id(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    name: &str,
) -> Result<TemplateId> {
    let listing = api.list_config_templates(shard, org).await;
    Lookup::scan(listing, |template: ConfigTemplate| {
        (template.name == name).then_some(template.id)
    })
    .require(&format!("template `{name}`"), "list configuration templates")
}
