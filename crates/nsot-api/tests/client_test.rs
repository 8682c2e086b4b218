#![allow(clippy::unwrap_used)]
// Integration tests for `NsotClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nsot_api::types::{DeviceCreate, DeviceUpdate, NetworkCreate};
use nsot_api::{
    Credentials, Error, ListQuery, NetworkRelation, NsotClient, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NsotClient) {
    let server = MockServer::start().await;
    let client = NsotClient::new(
        &server.uri(),
        &Credentials::AuthHeader {
            email: "admin@example.com".into(),
        },
        &TransportConfig::default(),
    )
    .unwrap()
    .with_site(Some(1));
    (server, client)
}

fn site_path(suffix: &str) -> String {
    format!("/api/sites/1/{suffix}")
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_auth_header_sent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/")))
        .and(header("X-NSoT-Email", "admin@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let page = client.list_devices(&ListQuery::default()).await.unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn test_authenticate_returns_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/authenticate/"))
        .and(body_json(json!({"email": "admin@example.com", "secret_key": "s3cr3t"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"auth_token": "tok-1"})))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "s3cr3t".to_string().into();
    let token = NsotClient::authenticate(
        &server.uri(),
        "admin@example.com",
        &secret,
        &TransportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(token.expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_authenticate_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/authenticate/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = NsotClient::authenticate(
        &server.uri(),
        "admin@example.com",
        &secret,
        &TransportConfig::default(),
    )
    .await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_paginated() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("devices/")))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 5,
            "limit": 2,
            "offset": 2,
            "results": [
                {"id": 3, "hostname": "sw3", "site_id": 1, "attributes": {}},
                {"id": 4, "hostname": "sw4", "site_id": 1, "attributes": {"vendor": "arista"}}
            ]
        })))
        .mount(&server)
        .await;

    let page = client.list_devices(&ListQuery::page(2, 2)).await.unwrap();

    assert_eq!(page.count, 5);
    assert_eq!(page.offset, Some(2));
    let hostnames: Vec<&str> = page.results.iter().map(|d| d.hostname.as_str()).collect();
    assert_eq!(hostnames, ["sw3", "sw4"]);
    assert_eq!(page.results[1].attributes["vendor"], json!("arista"));
}

#[tokio::test]
async fn test_create_device_posts_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("devices/")))
        .and(body_json(json!({"hostname": "sw1", "attributes": {}, "site_id": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "hostname": "sw1", "site_id": 1, "attributes": {}
        })))
        .mount(&server)
        .await;

    let device = client
        .create_device(&DeviceCreate {
            hostname: "sw1".into(),
            attributes: indexmap::IndexMap::new(),
            site_id: Some(1),
        })
        .await
        .unwrap();

    assert_eq!(device.id, 7);
}

#[tokio::test]
async fn test_update_device_sends_only_set_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(site_path("devices/7/")))
        .and(body_json(json!({"hostname": "sw1-new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "hostname": "sw1-new", "site_id": 1, "attributes": {}
        })))
        .mount(&server)
        .await;

    let device = client
        .update_device(
            7,
            &DeviceUpdate {
                hostname: Some("sw1-new".into()),
                ..DeviceUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(device.hostname, "sw1-new");
}

#[tokio::test]
async fn test_delete_device_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(site_path("devices/7/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device(7).await.unwrap();
}

// ── Network tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_network_with_cidr() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("networks/")))
        .and(body_json(json!({"cidr": "10.0.0.0/24", "attributes": {}, "site_id": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "network_address": "10.0.0.0",
            "prefix_length": 24,
            "site_id": 1,
            "state": "allocated",
            "parent_id": null,
            "is_ip": false,
            "ip_version": "4",
            "attributes": {}
        })))
        .mount(&server)
        .await;

    let network = client
        .create_network(&NetworkCreate {
            cidr: "10.0.0.0/24".into(),
            attributes: indexmap::IndexMap::new(),
            state: None,
            site_id: Some(1),
        })
        .await
        .unwrap();

    assert_eq!(network.prefix_length, 24);
    assert_eq!(network.state.as_deref(), Some("allocated"));
}

#[tokio::test]
async fn test_network_descendants_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("networks/12/descendents/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 13, "network_address": "10.0.0.0", "prefix_length": 25, "parent_id": 12}
        ])))
        .mount(&server)
        .await;

    let page = client
        .network_relatives(12, NetworkRelation::Descendants)
        .await
        .unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].parent_id, Some(12));
}

#[tokio::test]
async fn test_root_network_has_no_parent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("networks/12/parent/")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Not found.", "code": 404}
        })))
        .mount(&server)
        .await;

    assert!(client.network_parent(12).await.unwrap().is_none());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_field_error_keeps_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("devices/")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": {"hostname": ["This field is required."]}, "code": 400}
        })))
        .mount(&server)
        .await;

    let result = client
        .create_device(&DeviceCreate {
            hostname: String::new(),
            attributes: indexmap::IndexMap::new(),
            site_id: Some(1),
        })
        .await;

    match result {
        Err(ref err @ Error::Api { status, ref message, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "hostname: This field is required.");
            assert_eq!(
                err.detail().unwrap(),
                &json!({"hostname": ["This field is required."]})
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_device(1).await;
    assert!(
        matches!(result, Err(Error::InvalidCredentials)),
        "expected InvalidCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_not_found_is_flagged() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("changes/99/")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Not found.", "code": 404}
        })))
        .mount(&server)
        .await;

    let err = client.get_change(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("attributes/3/")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.get_attribute(3).await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
