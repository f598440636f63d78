//! Organization and shard resolution.

use crate::api::DashboardApi;
use onboard_core::{Error, Lookup, Result, ShardEndpoint};
use onboard_dashboard::Organization;
use tracing::{debug, info};

/// Resolves an organization by exact, case-sensitive name.
///
/// # Errors
///
/// [`Error::NotFound`] if no organization carries the name, [`Error::Upstream`]
/// if the organization listing failed.
pub async fn resolve_organization(api: &dyn DashboardApi, name: &str) -> Result<Organization> {
    let listing = api.list_organizations().await;
    let organization = Lookup::scan(listing, |org: Organization| (org.name == name).then_some(org))
        .require(&format!("organization `{name}`"), "list organizations")?;

    info!(org_id = %organization.id, name, "resolved organization");
    Ok(organization)
}

/// Resolves the shard endpoint serving `org`.
///
/// # Errors
///
/// [`Error::NotFound`] if the dashboard reports no host for the organization,
/// [`Error::Upstream`] if the settings request failed.
pub async fn resolve_shard_endpoint(
    api: &dyn DashboardApi,
    org: &Organization,
) -> Result<ShardEndpoint> {
    let snmp = api.organization_snmp(&org.id).await.map_err(|err| match err {
        Error::NotFound(_) => {
            Error::NotFound(format!("shard settings for organization `{}`", org.name))
        }
        other => Error::upstream("fetch organization shard", &other),
    })?;

    let host = snmp
        .hostname
        .filter(|host| !host.trim().is_empty())
        .ok_or_else(|| Error::NotFound(format!("shard host for organization `{}`", org.name)))?;
    debug!(host = %host, "organization shard host");

    let shard = api.shard_for_host(&host)?;
    info!(shard = %shard, "resolved shard endpoint");
    Ok(shard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{org_id, shard};
    use crate::api::MockDashboardApi;
    use onboard_dashboard::OrganizationSnmp;

    fn orgs() -> Vec<Organization> {
        vec![
            Organization {
                id: onboard_core::ids::OrganizationId::new("1"),
                name: "acme".into(),
            },
            Organization {
                id: org_id(),
                name: "Acme".into(),
            },
        ]
    }

    #[tokio::test]
    async fn resolves_exact_name() {
        let mut api = MockDashboardApi::new();
        api.expect_list_organizations()
            .times(1)
            .returning(|| Ok(orgs()));

        let org = resolve_organization(&api, "Acme").await.unwrap();
        assert_eq!(org.id, org_id());
    }

    #[tokio::test]
    async fn missing_organization_is_not_found() {
        let mut api = MockDashboardApi::new();
        api.expect_list_organizations().returning(|| Ok(orgs()));

        let err = resolve_organization(&api, "ACME").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn listing_failure_is_upstream() {
        let mut api = MockDashboardApi::new();
        api.expect_list_organizations()
            .returning(|| Err(Error::InvalidRequest("bad key".into())));

        let err = resolve_organization(&api, "Acme").await.unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
    }

    #[tokio::test]
    async fn shard_is_built_from_snmp_hostname() {
        let mut api = MockDashboardApi::new();
        api.expect_organization_snmp()
            .withf(|org| org.as_str() == "549236")
            .returning(|_| {
                Ok(OrganizationSnmp {
                    hostname: Some("n149.meraki.com".into()),
                    port: Some(16100),
                })
            });
        api.expect_shard_for_host()
            .withf(|host| host == "n149.meraki.com")
            .returning(|_| Ok(shard()));

        let orgs = orgs();
        let endpoint = resolve_shard_endpoint(&api, &orgs[1]).await.unwrap();
        assert_eq!(endpoint.host(), "n149.meraki.com");
    }

    #[tokio::test]
    async fn blank_hostname_is_not_found() {
        let mut api = MockDashboardApi::new();
        api.expect_organization_snmp().returning(|_| {
            Ok(OrganizationSnmp {
                hostname: Some(String::new()),
                port: None,
            })
        });
        api.expect_shard_for_host().never();

        let err = resolve_shard_endpoint(&api, &orgs()[1]).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn snmp_failure_is_upstream() {
        let mut api = MockDashboardApi::new();
        api.expect_organization_snmp()
            .returning(|_| Err(Error::ServiceUnavailable("503".into())));

        let err = resolve_shard_endpoint(&api, &orgs()[1]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Upstream { operation, .. } if operation == "fetch organization shard"
        ));
    }
}
