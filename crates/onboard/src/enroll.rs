//! Device enrollment into the target network.

use crate::api::DashboardApi;
use crate::classify::DeviceRecord;
use onboard_core::ids::{NetworkId, Serial};
use onboard_core::{Error, Result, ShardEndpoint};
use onboard_dashboard::{DeviceField, DeviceUpdate};
use tracing::{debug, info, warn};

/// Hostname given to an enrolled device.
#[must_use]
pub fn hostname(model: &str, serial: &Serial) -> String {
    format!("{model}_{serial}")
}

/// A device that now belongs to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledDevice {
    /// Serial number.
    pub serial: Serial,
    /// Model as reported by the network.
    pub model: String,
    /// Hostname written to the device.
    pub hostname: String,
}

/// Writes one device field. Failure is logged and ignored.
pub async fn set_device_field(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    network: &NetworkId,
    serial: &Serial,
    field: DeviceField,
    value: &str,
    move_map_marker: bool,
) {
    let update = DeviceUpdate::field(field, value, move_map_marker);
    match api.update_network_device(shard, network, serial, &update).await {
        Ok(()) => debug!(%serial, field = field.as_str(), "updated device field"),
        Err(err) => {
            warn!(%serial, field = field.as_str(), error = %err, "updating device field failed");
        }
    }
}

/// Claims one device into the network, confirms it landed there and names it.
///
/// # Errors
///
/// [`Error::EnrollmentFailed`] if the device cannot be read back from the
/// network after the claim.
pub async fn enroll_device(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    network: &NetworkId,
    serial: &Serial,
    address: Option<&str>,
) -> Result<EnrolledDevice> {
    if let Err(err) = api.claim_into_network(shard, network, serial).await {
        warn!(%serial, network_id = %network, error = %err, "claiming device into network failed");
    }

    let device = api
        .get_network_device(shard, network, serial)
        .await
        .map_err(|err| {
            warn!(
                %serial,
                network_id = %network,
                error = %err,
                "device not found in network after claim"
            );
            Error::EnrollmentFailed {
                serial: serial.to_string(),
                network: network.to_string(),
            }
        })?;

    let hostname = hostname(&device.model, serial);
    set_device_field(api, shard, network, serial, DeviceField::Name, &hostname, false).await;

    if let Some(address) = address {
        set_device_field(api, shard, network, serial, DeviceField::Address, address, true).await;
    }

    info!(%serial, hostname = %hostname, network_id = %network, "enrolled device");
    Ok(EnrolledDevice {
        serial: serial.clone(),
        model: device.model,
        hostname,
    })
}

/// Enrolls every record with a recognized family, in order.
///
/// # Errors
///
/// Stops at the first [`Error::EnrollmentFailed`].
pub async fn enroll_devices(
    api: &dyn DashboardApi,
    shard: &ShardEndpoint,
    network: &NetworkId,
    records: &[DeviceRecord],
    address: Option<&str>,
) -> Result<Vec<EnrolledDevice>> {
    let mut enrolled = Vec::new();
    for record in records.iter().filter(|record| record.is_enrollable()) {
        enrolled.push(enroll_device(api, shard, network, &record.serial, address).await?);
    }
    Ok(enrolled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{network_device, shard};
    use crate::api::MockDashboardApi;
    use mockall::Sequence;

    fn net() -> NetworkId {
        NetworkId::new("N_1")
    }

    #[test]
    fn hostname_joins_model_and_serial() {
        assert_eq!(hostname("MS120-8", &Serial::new("Q2MS-0001")), "MS120-8_Q2MS-0001");
    }

    #[tokio::test]
    async fn enrolls_with_name_then_address() {
        let mut api = MockDashboardApi::new();
        let mut seq = Sequence::new();
        api.expect_claim_into_network()
            .withf(|shard, network, serial| {
                shard.host() == "n149.meraki.com"
                    && network.as_str() == "N_1"
                    && serial.as_str() == "Q2MR-0001"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        api.expect_get_network_device()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(network_device("Q2MR-0001", "MR34")));
        api.expect_update_network_device()
            .withf(|_, _, _, update| {
                *update == DeviceUpdate::field(DeviceField::Name, "MR34_Q2MR-0001", false)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));
        api.expect_update_network_device()
            .withf(|_, _, _, update| {
                *update == DeviceUpdate::field(DeviceField::Address, "Mannerheimintie 1", true)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));

        let serial = Serial::new("Q2MR-0001");
        let device = enroll_device(&api, &shard(), &net(), &serial, Some("Mannerheimintie 1"))
            .await
            .unwrap();
        assert_eq!(device.hostname, "MR34_Q2MR-0001");
    }

    #[tokio::test]
    async fn soft_failures_do_not_stop_enrollment() {
        let mut api = MockDashboardApi::new();
        api.expect_claim_into_network()
            .returning(|_, _, _| Err(Error::HttpError("dashboard error 400".into())));
        api.expect_get_network_device()
            .returning(|_, _, serial| Ok(network_device(serial.as_str(), "MX64")));
        api.expect_update_network_device()
            .times(1)
            .returning(|_, _, _, _| Err(Error::ServiceUnavailable("503".into())));

        let device = enroll_device(&api, &shard(), &net(), &Serial::new("Q2MX-0001"), None)
            .await
            .unwrap();
        assert_eq!(device.model, "MX64");
    }

    #[tokio::test]
    async fn missing_device_after_claim_is_fatal() {
        let mut api = MockDashboardApi::new();
        api.expect_claim_into_network().returning(|_, _, _| Ok(()));
        api.expect_get_network_device()
            .returning(|_, _, _| Err(Error::NotFound("device".into())));
        api.expect_update_network_device().never();

        let err = enroll_device(&api, &shard(), &net(), &Serial::new("Q2MS-0001"), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::EnrollmentFailed {
                serial: "Q2MS-0001".into(),
                network: "N_1".into(),
            }
        );
    }

    #[tokio::test]
    async fn only_recognized_families_are_enrolled() {
        let mut api = MockDashboardApi::new();
        api.expect_claim_into_network()
            .withf(|_, _, serial| serial.as_str() == "Q2MS-0001")
            .times(1)
            .returning(|_, _, _| Ok(()));
        api.expect_get_network_device()
            .returning(|_, _, serial| Ok(network_device(serial.as_str(), "MS120")));
        api.expect_update_network_device().returning(|_, _, _, _| Ok(()));

        let records = vec![
            DeviceRecord::unresolved(Serial::new("KEY-1")),
            DeviceRecord::device(Serial::new("Q2MV-0001"), "MV12"),
            DeviceRecord::device(Serial::new("Q2MS-0001"), "MS120"),
        ];
        let enrolled = enroll_devices(&api, &shard(), &net(), &records, None).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].serial, Serial::new("Q2MS-0001"));
    }

    #[tokio::test]
    async fn enrollment_stops_at_first_failure() {
        let mut api = MockDashboardApi::new();
        api.expect_claim_into_network().times(1).returning(|_, _, _| Ok(()));
        api.expect_get_network_device()
            .returning(|_, _, _| Err(Error::Timeout("slow".into())));

        let records = vec![
            DeviceRecord::device(Serial::new("A"), "MR34"),
            DeviceRecord::device(Serial::new("B"), "MR34"),
        ];
        let err = enroll_devices(&api, &shard(), &net(), &records, None).await.unwrap_err();
        assert!(matches!(err, Error::EnrollmentFailed { serial, .. } if serial == "A"));
    }
}
