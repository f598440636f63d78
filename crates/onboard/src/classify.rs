//! Device classification.
//!
//! Every serial is claimed into the organization inventory first. Serials the
//! inventory then knows are devices with a model; anything else is treated as a
//! license key and claimed as added device capacity. The models found decide
//! which product families the network has to carry.

use crate::api::DashboardApi;
use onboard_core::ids::{OrganizationId, Serial};
use onboard_core::ShardEndpoint;
use onboard_dashboard::{ClaimRequest, InventoryDevice};
use std::fmt;
use tracing::{debug, info, warn};

/// Product family derived from a model prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductFamily {
    /// Security appliances (`MX`, `Z1`).
    Appliance,
    /// Switches (`MS`).
    Switch,
    /// Wireless access points (`MR`).
    AccessPoint,
}

impl ProductFamily {
    /// Classifies a model by its first two characters, case-sensitively.
    #[must_use]
    pub fn from_model(model: &str) -> Option<Self> {
        match model.get(..2)? {
            "MX" | "Z1" => Some(Self::Appliance),
            "MS" => Some(Self::Switch),
            "MR" => Some(Self::AccessPoint),
            _ => None,
        }
    }

    /// Word used for this family in a network type.
    #[must_use]
    pub const fn network_word(&self) -> &'static str {
        match self {
            Self::AccessPoint => "wireless",
            Self::Switch => "switch",
            Self::Appliance => "appliance",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.network_word())
    }
}

/// A serial after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Serial number (or license key) as given.
    pub serial: Serial,
    /// Inventory model; `None` when the serial is not an inventory device.
    pub model: Option<String>,
}

impl DeviceRecord {
    /// Record for a serial found in the inventory.
    #[must_use]
    pub fn device(serial: Serial, model: impl Into<String>) -> Self {
        Self {
            serial,
            model: Some(model.into()),
        }
    }

    /// Record for a serial the inventory does not know.
    #[must_use]
    pub const fn unresolved(serial: Serial) -> Self {
        Self {
            serial,
            model: None,
        }
    }

    /// Product family, if the model has a recognized prefix.
    #[must_use]
    pub fn family(&self) -> Option<ProductFamily> {
        self.model.as_deref().and_then(ProductFamily::from_model)
    }

    /// Only devices with a recognized family are enrolled into the network.
    #[must_use]
    pub fn is_enrollable(&self) -> bool {
        self.family().is_some()
    }
}

/// Which product families are present among the classified devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceMix {
    /// At least one switch.
    pub has_switch: bool,
    /// At least one access point.
    pub has_access_point: bool,
    /// At least one appliance.
    pub has_appliance: bool,
}

impl DeviceMix {
    /// Folds the families of all records.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a DeviceRecord>) -> Self {
        records
            .into_iter()
            .filter_map(DeviceRecord::family)
            .fold(Self::default(), Self::add)
    }

    /// Adds one family to the mix.
    #[must_use]
    pub const fn add(mut self, family: ProductFamily) -> Self {
        match family {
            ProductFamily::Switch => self.has_switch = true,
            ProductFamily::AccessPoint => self.has_access_point = true,
            ProductFamily::Appliance => self.has_appliance = true,
        }
        self
    }

    /// Returns true if no family is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.has_switch || self.has_access_point || self.has_appliance)
    }

    /// Space-separated network type, always ordered wireless, switch, appliance.
    #[must_use]
    pub fn network_type(&self) -> String {
        [
            (self.has_access_point, ProductFamily::AccessPoint),
            (self.has_switch, ProductFamily::Switch),
            (self.has_appliance, ProductFamily::Appliance),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, family)| family.network_word())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Splits serial input on whitespace, dropping empty tokens and keeping order.
#[must_use]
pub fn parse_serials(input: &str) -> Vec<Serial> {
    input.split_whitespace().map(Serial::new).collect()
}

/// Claims a serial into the organization. Failure is logged and ignored.
pub async fn claim_into_organization(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    serial: &Serial,
) {
    let request = ClaimRequest::device(serial.clone());
    if let Err(err) = api.claim_into_organization(shard, org, &request).await {
        warn!(%serial, error = %err, "claiming device into organization failed");
    }
}

/// Finds a serial in the organization inventory.
///
/// A failed inventory listing is treated as absence.
pub async fn lookup_org_device(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    serial: &Serial,
) -> Option<InventoryDevice> {
    match api.list_inventory(shard, org).await {
        Ok(inventory) => inventory.into_iter().find(|device| &device.serial == serial),
        Err(err) => {
            warn!(
                %serial,
                error = %err,
                "inventory listing failed; treating serial as not a device"
            );
            None
        }
    }
}

/// Claims a license key into the organization. Failure is logged and ignored.
pub async fn claim_license(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    key: &str,
) {
    let request = ClaimRequest::license(key);
    if let Err(err) = api.claim_into_organization(shard, org, &request).await {
        warn!(error = %err, "claiming license into organization failed");
    }
}

/// Claims and classifies every serial, in input order.
pub async fn classify_devices(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    org: &OrganizationId,
    serials: &[Serial],
) -> Vec<DeviceRecord> {
    let mut records = Vec::with_capacity(serials.len());

    for serial in serials {
        claim_into_organization(api, shard, org, serial).await;

        let record = match lookup_org_device(api, shard, org, serial).await {
            Some(device) => {
                debug!(%serial, model = %device.model, "found device in inventory");
                DeviceRecord::device(serial.clone(), device.model)
            }
            None => {
                info!(%serial, "serial is a license or unsupported device");
                claim_license(api, shard, org, serial.as_str()).await;
                DeviceRecord::unresolved(serial.clone())
            }
        };
        records.push(record);
    }

    records
}
