//! Dashboard API client and data models for device onboarding.
//!
//! Covers only the calls an onboarding run makes: organization and shard
//! lookup, network and template listing, network creation, claims, device
//! updates and template binding.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{DashboardClient, DashboardClientBuilder, API_KEY_HEADER};
pub use models::{
    BindRequest, ClaimRequest, ConfigTemplate, CreateNetworkRequest, DeviceField, DeviceUpdate,
    InventoryDevice, Network, NetworkClaimRequest, NetworkDevice, Organization, OrganizationSnmp,
};

/// Convenient result alias sharing the `onboard-core` error type.
pub type Result<T> = onboard_core::Result<T>;
