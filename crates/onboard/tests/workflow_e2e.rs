//! End-to-end runs against mock dashboard servers.
//!
//! The default server only answers organization-level calls; everything after
//! shard resolution must reach the shard server.

use onboard::{BindOutcome, OnboardRequest, Onboarding, Provisioned};
use onboard_core::config::{OnboardConfig, OnboardPolicy};
use onboard_core::ids::NetworkId;
use onboard_core::Error;
use onboard_dashboard::{DashboardClient, DashboardClientBuilder, API_KEY_HEADER};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "549236";

struct Dashboard {
    default: MockServer,
    shard: MockServer,
}

impl Dashboard {
    /// Default host resolving organization `Acme` to the shard server.
    async fn start() -> Self {
        let default = MockServer::start().await;
        let shard = MockServer::start().await;
        let shard_host = shard.uri().trim_start_matches("http://").to_string();

        Mock::given(method("GET"))
            .and(path("/organizations"))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "acme"},
                {"id": 549_236, "name": "Acme"}
            ])))
            .expect(1)
            .mount(&default)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/organizations/{ORG}/snmp")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "v2cEnabled": false,
                "v3Enabled": false,
                "hostname": shard_host,
                "port": 16100
            })))
            .expect(1)
            .mount(&default)
            .await;
        let shard_paths =
            r"^/(networks/|organizations/\d+/(networks|inventory|claim|configTemplates))";
        Mock::given(path_regex(shard_paths))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&default)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/organizations/{ORG}/configTemplates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "L_9", "name": "Retail"}
            ])))
            .mount(&shard)
            .await;

        Self { default, shard }
    }

    fn client(&self, config: &OnboardConfig) -> DashboardClient {
        DashboardClientBuilder::new(&config.api_base_url)
            .unwrap()
            .with_http_config(config.client_config())
            .with_api_key(SecretString::from("test-key"))
            .build()
            .unwrap()
    }

    fn config(&self, policy: OnboardPolicy) -> OnboardConfig {
        OnboardConfig::new(self.default.uri()).unwrap().with_policy(policy)
    }

    async fn existing_network(&self, id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/organizations/{ORG}/networks")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": id, "organizationId": ORG, "name": "Branch1", "type": "wireless"}
            ])))
            .mount(&self.shard)
            .await;
    }

    async fn inventory(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/organizations/{ORG}/claim")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.shard)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/organizations/{ORG}/inventory")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "serial": "MR34-AAAA",
                    "model": "MR34",
                    "mac": "00:18:0a:00:00:01",
                    "networkId": null
                },
                {
                    "serial": "MS120-BBBB",
                    "model": "MS120-8",
                    "mac": "00:18:0a:00:00:02",
                    "networkId": null
                }
            ])))
            .mount(&self.shard)
            .await;
    }

    async fn enrollable(&self, network: &str, serial: &str, model: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/networks/{network}/devices/claim")))
            .and(body_json(json!({"serial": serial})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&self.shard)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/networks/{network}/devices/{serial}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "serial": serial,
                "model": model,
                "networkId": network
            })))
            .mount(&self.shard)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/networks/{network}/devices/{serial}")))
            .and(body_json(json!({"name": format!("{model}_{serial}"), "moveMapMarker": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"serial": serial})))
            .expect(1)
            .mount(&self.shard)
            .await;
    }
}

fn request() -> OnboardRequest {
    OnboardRequest::new(
        "Acme",
        onboard::classify::parse_serials("MR34-AAAA MS120-BBBB"),
        "Branch1",
        "Retail",
    )
    .with_tags("retail")
}

#[tokio::test]
async fn creates_network_enrolls_devices_and_binds_on_shard() {
    let dashboard = Dashboard::start().await;
    dashboard.inventory().await;

    // Absent for the existence check and the pre-create lookup, present afterwards.
    Mock::given(method("GET"))
        .and(path(format!("/organizations/{ORG}/networks")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(2)
        .expect(2)
        .mount(&dashboard.shard)
        .await;
    dashboard.existing_network("N_1").await;

    Mock::given(method("POST"))
        .and(path(format!("/organizations/{ORG}/networks")))
        .and(body_json(json!({
            "name": "Branch1",
            "timeZone": "Europe/Helsinki",
            "tags": "retail",
            "organizationId": ORG,
            "type": "wireless switch"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "N_1", "name": "Branch1"})),
        )
        .expect(1)
        .mount(&dashboard.shard)
        .await;
    dashboard.enrollable("N_1", "MR34-AAAA", "MR34").await;
    dashboard.enrollable("N_1", "MS120-BBBB", "MS120-8").await;
    Mock::given(method("POST"))
        .and(path("/networks/N_1/bind"))
        .and(body_json(json!({"configTemplateId": "L_9", "autoBind": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&dashboard.shard)
        .await;

    let config = dashboard.config(OnboardPolicy::strict());
    let client = dashboard.client(&config);
    let report = Onboarding::new(&client, &config).run(&request()).await.unwrap();

    assert_eq!(report.network_type, "wireless switch");
    assert_eq!(report.network, Provisioned::Created(NetworkId::new("N_1")));
    assert_eq!(report.enrolled.len(), 2);
    assert_eq!(report.bind, BindOutcome::Bound { auto_bind: true });
}

#[tokio::test]
async fn existing_network_fails_before_any_claim() {
    let dashboard = Dashboard::start().await;
    dashboard.existing_network("N_5").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&dashboard.shard)
        .await;

    let config = dashboard.config(OnboardPolicy::strict());
    let client = dashboard.client(&config);
    let err = Onboarding::new(&client, &config).run(&request()).await.unwrap_err();

    assert_eq!(err, Error::AlreadyExists("Branch1".into()));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn ignore_error_reuses_network_and_survives_bind_failure() {
    let dashboard = Dashboard::start().await;
    dashboard.inventory().await;
    dashboard.existing_network("N_5").await;
    Mock::given(method("POST"))
        .and(path(format!("/organizations/{ORG}/networks")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&dashboard.shard)
        .await;
    dashboard.enrollable("N_5", "MR34-AAAA", "MR34").await;
    dashboard.enrollable("N_5", "MS120-BBBB", "MS120-8").await;
    Mock::given(method("POST"))
        .and(path("/networks/N_5/bind"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"errors": ["already bound"]})),
        )
        .expect(1)
        .mount(&dashboard.shard)
        .await;

    let config = dashboard.config(OnboardPolicy::ignore_error());
    let client = dashboard.client(&config);
    let report = Onboarding::new(&client, &config).run(&request()).await.unwrap();

    assert_eq!(report.network, Provisioned::Reused(NetworkId::new("N_5")));
    assert!(!report.bind.is_bound());
}

#[tokio::test]
async fn device_missing_after_claim_stops_the_run() {
    let dashboard = Dashboard::start().await;
    dashboard.inventory().await;
    dashboard.existing_network("N_5").await;
    Mock::given(method("POST"))
        .and(path("/networks/N_5/devices/claim"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&dashboard.shard)
        .await;
    Mock::given(method("GET"))
        .and(path("/networks/N_5/devices/MR34-AAAA"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&dashboard.shard)
        .await;
    Mock::given(method("POST"))
        .and(path("/networks/N_5/bind"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&dashboard.shard)
        .await;

    let config = dashboard.config(OnboardPolicy::ignore_error());
    let client = dashboard.client(&config);
    let err = Onboarding::new(&client, &config).run(&request()).await.unwrap_err();

    assert_eq!(
        err,
        Error::EnrollmentFailed {
            serial: "MR34-AAAA".into(),
            network: "N_5".into(),
        }
    );
}
