//! The onboarding run.
//!
//! [`Onboarding::run`] drives the stages in order: organization and shard,
//! network existence check, template, device classification, network
//! provisioning, enrollment and finally template binding. Each stage only sees
//! what earlier stages resolved, carried in a [`RunContext`]. The run stops at
//! the first fatal error; nothing already done is rolled back.

use crate::api::DashboardApi;
use crate::bind::{bind_template, BindOutcome};
use crate::classify::{classify_devices, DeviceMix, DeviceRecord};
use crate::directory::{resolve_organization, resolve_shard_endpoint};
use crate::enroll::{enroll_devices, EnrolledDevice};
use crate::entities::resolve_template_id;
use crate::provision::{ensure_network, existing_network, NetworkSpec, Provisioned};
use onboard_core::config::OnboardConfig;
use onboard_core::ids::{NetworkId, Serial, TemplateId};
use onboard_core::{Error, Result, ShardEndpoint};
use onboard_dashboard::Organization;
use tracing::{info, instrument};

/// Receives user-facing progress lines.
pub type Notifier = Box<dyn Fn(&str) + Send + Sync>;

/// Inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardRequest {
    /// Organization name.
    pub organization: String,
    /// Serial numbers or license keys, in order.
    pub serials: Vec<Serial>,
    /// Target network name.
    pub network_name: String,
    /// Configuration template name.
    pub template_name: String,
    /// Space-separated tags for a created network.
    pub tags: Option<String>,
    /// Street address written to every enrolled device.
    pub address: Option<String>,
    /// Type label overriding the one derived from the devices.
    pub network_type: Option<String>,
}

impl OnboardRequest {
    /// Request with the mandatory inputs.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        serials: Vec<Serial>,
        network_name: impl Into<String>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            serials,
            network_name: network_name.into(),
            template_name: template_name.into(),
            tags: None,
            address: None,
            network_type: None,
        }
    }

    /// Set tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Set the device address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Override the derived network type.
    #[must_use]
    pub fn with_network_type(mut self, network_type: impl Into<String>) -> Self {
        self.network_type = Some(network_type.into());
        self
    }

    /// Checks the request before any call is made.
    ///
    /// # Errors
    ///
    /// [`Error::ValidationError`] for blank names or an empty serial list.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("organization", &self.organization),
            ("network name", &self.network_name),
            ("template name", &self.template_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ValidationError(format!("{field} cannot be empty")));
            }
        }
        if self.serials.is_empty() {
            return Err(Error::ValidationError("no serial numbers given".to_string()));
        }
        Ok(())
    }
}

/// What the run has resolved so far.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The organization.
    pub organization: Organization,
    /// The shard serving it.
    pub shard: ShardEndpoint,
    /// The template to bind.
    pub template: TemplateId,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct OnboardReport {
    /// The organization.
    pub organization: Organization,
    /// Host of the shard used.
    pub shard_host: String,
    /// Every serial after classification.
    pub devices: Vec<DeviceRecord>,
    /// Network type sent on creation, after remapping of legacy labels.
    pub network_type: String,
    /// Network provisioning outcome.
    pub network: Provisioned,
    /// Devices enrolled into the network.
    pub enrolled: Vec<EnrolledDevice>,
    /// Template binding outcome.
    pub bind: BindOutcome,
}

impl OnboardReport {
    /// The target network.
    #[must_use]
    pub const fn network_id(&self) -> Option<&NetworkId> {
        self.network.network_id()
    }
}

/// One onboarding run against a dashboard.
pub struct Onboarding<'a> {
    api: &'a dyn DashboardApi,
    config: &'a OnboardConfig,
    notifier: Notifier,
}

impl<'a> Onboarding<'a> {
    /// Run that reports progress through logs only.
    #[must_use]
    pub fn new(api: &'a dyn DashboardApi, config: &'a OnboardConfig) -> Self {
        Self {
            api,
            config,
            notifier: Box::new(|_| {}),
        }
    }

    /// Send user-facing progress lines to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    fn notify(&self, message: &str) {
        (self.notifier)(message);
    }

    /// Onboards the requested devices.
    ///
    /// # Errors
    ///
    /// The first fatal condition: an unknown organization, shard or template,
    /// an existing network when that is not tolerated, a failed network
    /// creation, a device missing from the network after its claim, or a bind
    /// failure when that is not tolerated.
    #[instrument(skip_all, fields(org = %request.organization, network = %request.network_name))]
    pub async fn run(&self, request: &OnboardRequest) -> Result<OnboardReport> {
        request.validate()?;
        let policy = self.config.policy;

        let ctx = self.resolve(request).await?;

        let records =
            classify_devices(self.api, &ctx.shard, &ctx.organization.id, &request.serials).await;
        for record in records.iter().filter(|record| record.model.is_none()) {
            self.notify(&format!(
                "Serial number {} is a license or unsupported device",
                record.serial
            ));
        }

        let mix = DeviceMix::from_records(&records);
        let mut spec = NetworkSpec::new(
            request.network_name.as_str(),
            self.config.time_zone.as_str(),
            ctx.organization.id.clone(),
            mix,
        );
        if let Some(tags) = &request.tags {
            spec = spec.with_tags(tags.as_str());
        }
        if let Some(network_type) = &request.network_type {
            spec = spec.with_network_type(network_type.as_str());
        }
        let network_type = spec
            .creation_type()
            .unwrap_or_else(|| spec.network_type.clone());
        info!(requested = %spec.network_type, network_type = %network_type, "derived network type");

        let network = ensure_network(
            self.api,
            &ctx.shard,
            &ctx.organization.id,
            &spec,
            policy.ignore_existing_network,
        )
        .await?;
        let network_id = match &network {
            Provisioned::Created(id) => {
                self.notify(&format!("Network {} created", spec.name));
                id.clone()
            }
            Provisioned::Reused(id) => {
                self.notify(&format!("Network {} already exists, using it", spec.name));
                id.clone()
            }
            Provisioned::Skipped { reason } => {
                self.notify(&format!("WARNING: {reason}"));
                return Err(Error::NotFound(format!(
                    "network `{}` for device enrollment",
                    spec.name
                )));
            }
        };

        let enrolled = enroll_devices(
            self.api,
            &ctx.shard,
            &network_id,
            &records,
            request.address.as_deref(),
        )
        .await?;
        for device in &enrolled {
            self.notify(&format!("Device {} added as {}", device.serial, device.hostname));
        }

        let bind = bind_template(
            self.api,
            &ctx.shard,
            &network_id,
            &ctx.template,
            mix,
            policy.tolerate_bind_failure,
        )
        .await?;
        match &bind {
            BindOutcome::Bound { .. } => {
                self.notify(&format!(
                    "Network {} bound to template {}",
                    spec.name, request.template_name
                ));
            }
            BindOutcome::Tolerated { error, .. } => {
                self.notify(&format!("WARNING: binding network {} failed: {error}", spec.name));
            }
        }

        Ok(OnboardReport {
            shard_host: ctx.shard.host().to_string(),
            organization: ctx.organization,
            devices: records,
            network_type,
            network,
            enrolled,
            bind,
        })
    }

    /// Organization, shard, early network check and template.
    async fn resolve(&self, request: &OnboardRequest) -> Result<RunContext> {
        let organization = resolve_organization(self.api, &request.organization).await?;
        let shard = resolve_shard_endpoint(self.api, &organization).await?;

        if !self.config.policy.ignore_existing_network
            && existing_network(self.api, &shard, &organization.id, &request.network_name)
                .await
                .is_some()
        {
            return Err(Error::AlreadyExists(request.network_name.clone()));
        }

        let template =
            resolve_template_id(self.api, &shard, &organization.id, &request.template_name).await?;

        Ok(RunContext {
            organization,
            shard,
            template,
        })
    }
}
