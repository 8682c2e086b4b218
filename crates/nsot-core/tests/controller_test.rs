#![allow(clippy::unwrap_used)]
// End-to-end tests for `Controller` against a wiremock NSoT server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nsot_core::command;
use nsot_core::{
    AttributeForm, AuthCredentials, ClientConfig, ConnectionState, Controller, DeviceForm,
    EntityId, NetworkForm, NetworkRelation, PageRequest, ResourceKind, Route, SubmissionError,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(
        server.uri().parse().unwrap(),
        AuthCredentials::AuthHeader {
            email: "admin@example.com".into(),
        },
    );
    let controller = Controller::new(config);

    Mock::given(method("GET"))
        .and(path("/api/users/0/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "email": "admin@example.com"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sites/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Lab"})),
        )
        .mount(&server)
        .await;

    controller.connect().await.unwrap();
    (server, controller)
}

fn site_path(suffix: &str) -> String {
    format!("/api/sites/1/{suffix}")
}

fn device(id: u64, hostname: &str) -> serde_json::Value {
    json!({"id": id, "hostname": hostname, "attributes": {}, "site_id": 1})
}

fn paged(results: serde_json::Value, count: u64, limit: u64, offset: u64) -> serde_json::Value {
    json!({"count": count, "limit": limit, "offset": offset, "results": results})
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_records_user_and_site() {
    let (_server, controller) = setup().await;

    let state = controller.store().state();
    assert_eq!(state.ui.user.as_ref().unwrap().email, "admin@example.com");
    assert_eq!(state.ui.site.as_ref().unwrap().name, "Lab");
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Connected
    );

    controller.disconnect().await;
    assert_eq!(
        *controller.connection_state().borrow(),
        ConnectionState::Disconnected
    );
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_devices_fills_the_slice() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/")))
        .and(query_param("limit", "25"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([device(1, "sw1"), device(2, "sw2")]),
            2,
            25,
            0,
        )))
        .mount(&server)
        .await;

    controller
        .execute(command::fetch_devices(PageRequest::first(25)))
        .await
        .unwrap();

    let state = controller.store().state();
    assert!(!state.devices.is_fetching);
    assert_eq!(state.devices.items.len(), 2);
    assert_eq!(state.devices.pagination.unwrap().count, 2);
}

#[tokio::test]
async fn second_page_uses_limit_times_page_offset() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/")))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([device(21, "sw21")]),
            21,
            10,
            20,
        )))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .execute(command::fetch_devices(PageRequest { page: 2, limit: 10 }))
        .await
        .unwrap();

    let info = controller.store().state().devices.pagination.unwrap();
    assert_eq!(info.page(), 2);
    assert_eq!(info.total_pages(), 3);
}

#[tokio::test]
async fn list_failure_clears_fetching_and_keeps_error() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("networks/")))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": {"code": 500, "message": "boom"}})),
        )
        .mount(&server)
        .await;

    let err = controller
        .execute(command::fetch_networks(PageRequest::first(25)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = controller.store().state();
    assert!(!state.networks.is_fetching);
    assert_eq!(state.networks.error.as_ref().unwrap().status, Some(500));
}

#[tokio::test]
async fn mounting_a_list_twice_fetches_once() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([device(1, "sw1")]),
            1,
            25,
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    controller.navigate(Route::Devices).await.unwrap();
    controller.navigate(Route::Home).await.ok();
    controller.navigate(Route::Devices).await.unwrap();

    assert_eq!(controller.store().state().route(), &Route::Devices);
}

// ── Details ─────────────────────────────────────────────────────────

#[tokio::test]
async fn device_detail_loads_entity_and_interfaces() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/7/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(7, "sw1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("devices/7/interfaces/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "device": 7, "name": "eth0"}
        ])))
        .mount(&server)
        .await;

    controller
        .navigate(Route::Device(EntityId::new(7)))
        .await
        .unwrap();

    let state = controller.store().state();
    assert_eq!(state.devices.item.as_ref().unwrap().hostname, "sw1");
    assert_eq!(state.interfaces.items.len(), 1);
    assert_eq!(state.route().path(), "/devices/7");
}

#[tokio::test]
async fn slow_detail_answer_does_not_hide_the_next_one() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/3/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(device(3, "sw3"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("devices/4/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(4, "sw4")))
        .expect(1)
        .mount(&server)
        .await;
    for id in [3, 4] {
        Mock::given(method("GET"))
            .and(path(site_path(&format!("devices/{id}/interfaces/"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
    }

    let first = controller.navigate(Route::Device(EntityId::new(3)));
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.navigate(Route::Device(EntityId::new(4))).await
    };
    let (first, second) = tokio::join!(first, second);
    first.unwrap();
    second.unwrap();

    let state = controller.store().state();
    assert_eq!(state.route().path(), "/devices/4");
    assert_eq!(state.devices.item.as_ref().unwrap().hostname, "sw4");
    assert!(!state.devices.is_fetching_item);
}

#[tokio::test]
async fn network_detail_loads_children() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("networks/1/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "network_address": "10.0.0.0", "prefix_length": 8
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("networks/1/children/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "network_address": "10.1.0.0", "prefix_length": 16, "parent_id": 1}
        ])))
        .mount(&server)
        .await;

    controller
        .navigate(Route::Network(EntityId::new(1)))
        .await
        .unwrap();

    let state = controller.store().state();
    assert_eq!(state.networks.item.as_ref().unwrap().cidr(), "10.0.0.0/8");
    assert!(state.related.is_for(EntityId::new(1), NetworkRelation::Children));
    assert_eq!(state.related.networks[0].cidr(), "10.1.0.0/16");
}

// ── Create flow ─────────────────────────────────────────────────────

#[tokio::test]
async fn creating_a_device_redirects_to_its_detail() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("devices/")))
        .and(body_json(json!({"hostname": "sw1", "attributes": {}, "site_id": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(device(7, "sw1")))
        .expect(1)
        .mount(&server)
        .await;

    controller.navigate(Route::Devices).await.ok();
    let id = controller
        .submit_device(&DeviceForm::new("sw1"))
        .await
        .unwrap();
    assert_eq!(id, EntityId::new(7));

    let state = controller.store().state();
    assert!(state.devices.items.iter().any(|d| d.hostname == "sw1"));
    assert!(!state.devices.is_fetching);
    assert!(!state.devices.is_creating);
    assert!(!state.ui.submitting);
    assert_eq!(state.route().path(), "/devices/7");
}

#[tokio::test]
async fn rejected_device_surfaces_the_hostname_message() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("devices/")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": 409, "message": {"hostname": ["Device with this hostname already exists."]}}
        })))
        .mount(&server)
        .await;

    let before = controller.store().state().route().clone();
    let err = controller
        .submit_device(&DeviceForm::new("sw1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Rejected { .. }));
    assert_eq!(
        err.message().as_deref(),
        Some("Device with this hostname already exists.")
    );
    let state = controller.store().state();
    assert_eq!(state.route(), &before);
    assert!(!state.ui.submitting);
    assert!(!state.devices.is_creating);
}

#[tokio::test]
async fn invalid_cidr_never_reaches_the_server() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("networks/")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .submit_network(&NetworkForm::new("10.0.0.0/99"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::Invalid(_)));
}

// ── Edit flow ───────────────────────────────────────────────────────

#[tokio::test]
async fn editing_a_device_patches_and_updates_the_slice() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/7/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(7, "sw1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("devices/7/interfaces/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(site_path("devices/7/")))
        .and(body_json(json!({"hostname": "core1", "attributes": {"vendor": "juniper"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "hostname": "core1", "attributes": {"vendor": "juniper"}, "site_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .navigate(Route::Device(EntityId::new(7)))
        .await
        .unwrap();

    let state = controller.store().state();
    let mut form = DeviceForm::from(state.devices.item.as_ref().unwrap());
    form.hostname = "core1".into();
    form.attributes = "vendor=juniper".into();

    let id = controller
        .update_device(EntityId::new(7), &form)
        .await
        .unwrap();
    assert_eq!(id, EntityId::new(7));

    let state = controller.store().state();
    let item = state.devices.item.as_ref().unwrap();
    assert_eq!(item.hostname, "core1");
    assert_eq!(item.attributes["vendor"], json!("juniper"));
    assert!(!state.devices.is_updating);
    assert!(!state.ui.submitting);
    assert_eq!(state.route().path(), "/devices/7");
}

#[tokio::test]
async fn rejected_edit_keeps_the_old_entity() {
    let (server, controller) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(site_path("attributes/5/")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": {"__all__": "Attribute is in use."}}
        })))
        .mount(&server)
        .await;

    let form = AttributeForm {
        name: "owner".into(),
        resource_name: "Device".into(),
        required: true,
        ..AttributeForm::default()
    };
    let err = controller
        .update_attribute(EntityId::new(5), &form)
        .await
        .unwrap_err();

    assert_eq!(err.message().as_deref(), Some("Attribute is in use."));
    let state = controller.store().state();
    assert!(!state.attributes.is_updating);
    assert!(!state.ui.submitting);
    assert_eq!(state.attributes.error.as_ref().unwrap().status, Some(400));
}

// ── Delete flow ─────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_the_shown_device_returns_to_the_list() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/7/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(7, "sw1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("devices/7/interfaces/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(site_path("devices/7/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .navigate(Route::Device(EntityId::new(7)))
        .await
        .unwrap();
    controller
        .delete(ResourceKind::Device, EntityId::new(7))
        .await
        .unwrap();

    let state = controller.store().state();
    assert_eq!(state.route(), &Route::Devices);
    assert!(state.devices.item.is_none());
}
