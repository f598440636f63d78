//! Template binding.

use crate::api::DashboardApi;
use crate::classify::DeviceMix;
use onboard_core::ids::{NetworkId, TemplateId};
use onboard_core::{Error, Result, ShardEndpoint};
use onboard_dashboard::BindRequest;
use tracing::{info, warn};

/// How binding ended.
#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    /// The network is bound to the template.
    Bound {
        /// Whether auto-bind was requested.
        auto_bind: bool,
    },
    /// Binding failed and the failure was tolerated.
    Tolerated {
        /// Whether auto-bind was requested.
        auto_bind: bool,
        /// The bind failure.
        error: Error,
    },
}

impl BindOutcome {
    /// Returns true if the network ended up bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }
}

/// Binds `network` to `template`.
///
/// # Errors
///
/// [`Error::Upstream`] if the dashboard rejects the bind.
pub async fn bind_network(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    network: &NetworkId,
    template: &TemplateId,
    auto_bind: bool,
) -> Result<()> {
    let request = BindRequest {
        config_template_id: template.clone(),
        auto_bind,
    };
    api.bind_network(shard, network, &request)
        .await
        .map_err(|err| Error::upstream("bind network to template", &err))?;

    info!(network_id = %network, template_id = %template, auto_bind, "bound network to template");
    Ok(())
}

/// Binds the network, requesting auto-bind iff switches are present.
///
/// # Errors
///
/// The bind failure, unless `tolerate_failure` is set.
pub async fn bind_template(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    network: &NetworkId,
    template: &TemplateId,
    mix: DeviceMix,
    tolerate_failure: bool,
) -> Result<BindOutcome> {
    let auto_bind = mix.has_switch;
    match bind_network(api, shard, network, template, auto_bind).await {
        Ok(()) => Ok(BindOutcome::Bound { auto_bind }),
        Err(error) if tolerate_failure => {
            warn!(network_id = %network, error = %error, "binding failed; continuing");
            Ok(BindOutcome::Tolerated { auto_bind, error })
        }
        Err(error) => Err(error),
    }
}
