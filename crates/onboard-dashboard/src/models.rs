//! Dashboard data models for organizations, networks, templates and devices.

use onboard_core::ids::{NetworkId, OrganizationId, Serial, TemplateId};
use serde::{Deserialize, Serialize};

/// License mode used when claiming a license key into an organization.
pub const LICENSE_MODE_ADD_DEVICES: &str = "addDevices";

/// Organization visible to the API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Organization identifier.
    pub id: OrganizationId,
    /// Organization name.
    pub name: String,
}

/// Organization SNMP settings; only the serving host is of interest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationSnmp {
    /// Hostname of the shard serving the organization.
    #[serde(default)]
    pub hostname: Option<String>,
    /// SNMP port on that host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Network within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network identifier.
    pub id: NetworkId,
    /// Network name.
    pub name: String,
    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Space-separated product types.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    /// Time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Space-separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Configuration template within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Template name.
    pub name: String,
}

/// Device record from the organization inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    /// Serial number.
    pub serial: Serial,
    /// Model name, e.g. `MR34`.
    pub model: String,
    /// MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Network the device belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<NetworkId>,
    /// Claim time as reported by the dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<serde_json::Value>,
    /// Last reported public IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
}

/// Device record within a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    /// Serial number.
    pub serial: Serial,
    /// Model name.
    pub model: String,
    /// Device name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Latitude of the map marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude of the map marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Owning network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<NetworkId>,
}

/// Request payload to create a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkRequest {
    /// Network name.
    pub name: String,
    /// Time zone.
    pub time_zone: String,
    /// Space-separated tags (may be empty).
    pub tags: String,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Space-separated product types.
    #[serde(rename = "type")]
    pub network_type: String,
}

/// Request payload to claim into an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ClaimRequest {
    /// Claim a device by serial number.
    Device {
        /// Serial number.
        serial: Serial,
    },
    /// Claim license capacity.
    License {
        /// License key.
        #[serde(rename = "licenseKey")]
        license_key: String,
        /// License mode.
        #[serde(rename = "licenseMode")]
        license_mode: String,
    },
}

impl ClaimRequest {
    /// Claim a device.
    #[must_use]
    pub fn device(serial: Serial) -> Self {
        Self::Device { serial }
    }

    /// Claim a license key, adding device capacity.
    #[must_use]
    pub fn license(key: impl Into<String>) -> Self {
        Self::License {
            license_key: key.into(),
            license_mode: LICENSE_MODE_ADD_DEVICES.to_string(),
        }
    }
}

/// Request payload to claim a device into a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkClaimRequest {
    /// Serial number.
    pub serial: Serial,
}

/// Device field to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    /// Device name (hostname).
    Name,
    /// Street address.
    Address,
}

impl DeviceField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
        }
    }
}

/// Request payload to update one field of a network device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    /// New device name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Move the map marker to the new address.
    pub move_map_marker: bool,
}

impl DeviceUpdate {
    /// Update a single field.
    #[must_use]
    pub fn field(field: DeviceField, value: impl Into<String>, move_map_marker: bool) -> Self {
        let value = Some(value.into());
        match field {
            DeviceField::Name => Self {
                name: value,
                address: None,
                move_map_marker,
            },
            DeviceField::Address => Self {
                name: None,
                address: value,
                move_map_marker,
            },
        }
    }
}

/// Request payload to bind a network to a configuration template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BindRequest {
    /// Template to bind to.
    pub config_template_id: TemplateId,
    /// Bind switches to template profiles by model.
    pub auto_bind: bool,
}
