//! Batch device onboarding for a cloud-managed network dashboard.
//!
//! Given an organization, a list of device serials (or license keys), a
//! network name and a configuration template, an [`Onboarding`] run:
//!
//! 1. resolves the organization and the shard host serving it,
//! 2. claims every serial into the organization and classifies it by model,
//! 3. creates the network with a type matching the devices found,
//! 4. claims the devices into the network and names them `model_serial`,
//! 5. binds the network to the template.
//!
//! ```no_run
//! use onboard::{Onboarding, OnboardRequest};
//! use onboard_core::config::OnboardConfig;
//! use onboard_dashboard::DashboardClientBuilder;
//!
//! # async fn example() -> onboard_core::Result<()> {
//! let config = OnboardConfig::default();
//! let client = DashboardClientBuilder::new(&config.api_base_url)?
//!     .with_api_key("api-key".to_string().into())
//!     .build()?;
//!
//! let request = OnboardRequest::new(
//!     "Acme",
//!     onboard::classify::parse_serials("Q2MR-0001 Q2MS-0001"),
//!     "Branch1",
//!     "Retail",
//! );
//! let report = Onboarding::new(&client, &config).run(&request).await?;
//! println!("network type: {}", report.network_type);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod api;
pub mod bind;
pub mod classify;
pub mod directory;
pub mod enroll;
pub mod entities;
pub mod provision;
pub mod workflow;

pub use api::DashboardApi;
pub use bind::BindOutcome;
pub use classify::{DeviceMix, DeviceRecord, ProductFamily};
pub use provision::{NetworkSpec, Provisioned};
pub use workflow::{OnboardReport, OnboardRequest, Onboarding, RunContext};
