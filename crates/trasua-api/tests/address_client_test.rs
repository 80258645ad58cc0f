#![allow(clippy::unwrap_used)]
// Integration tests for `AddressClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trasua_api::{AddressClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AddressClient) {
    let server = MockServer::start().await;
    let divisions = format!("{}/api", server.uri());
    let places = format!("{}/places", server.uri());
    let client = AddressClient::from_reqwest(&divisions, &places, reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Division lookup ─────────────────────────────────────────────────

#[tokio::test]
async fn test_list_provinces() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/provinces"))
        .and(query_param("depth", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "code": 1, "name": "Thành phố Hà Nội" },
            { "code": 79, "name": "Thành phố Hồ Chí Minh" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provinces = client.list_provinces().await.unwrap();

    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[1].code, "79");
    assert_eq!(provinces[1].name, "Thành phố Hồ Chí Minh");
}

#[tokio::test]
async fn test_get_province_with_districts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/provinces/79"))
        .and(query_param("depth", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 79,
            "name": "Thành phố Hồ Chí Minh",
            "districts": [
                { "code": 760, "name": "Quận 1" },
                { "code": 772, "name": "Quận 11" },
            ]
        })))
        .mount(&server)
        .await;

    let province = client.get_province("79").await.unwrap();

    assert_eq!(province.code, "79");
    assert_eq!(province.districts.len(), 2);
    assert_eq!(province.districts[1].name, "Quận 11");
}

#[tokio::test]
async fn test_get_district_without_wards_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/districts/772"))
        .and(query_param("depth", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 772, "name": "Quận 11" })),
        )
        .mount(&server)
        .await;

    let district = client.get_district("772").await.unwrap();
    assert_eq!(district.name, "Quận 11");
    assert!(district.wards.is_empty());
}

#[tokio::test]
async fn test_division_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/provinces/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client.get_province("999").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

// ── Places ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_autocomplete_place() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/autocomplete-place"))
        .and(query_param("text", "184 lê đại hành"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestions": [{
                "id": "p1",
                "name": "184 Lê Đại Hành",
                "label": "184 Lê Đại Hành, Phường 15, Quận 11, Thành phố Hồ Chí Minh",
                "region": "Thành phố Hồ Chí Minh"
            }]
        })))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let resp = client
        .autocomplete_place("184 lê đại hành", &token)
        .await
        .unwrap();

    assert_eq!(resp.suggestions.len(), 1);
    assert_eq!(resp.suggestions[0].id.as_deref(), Some("p1"));
}

#[tokio::test]
async fn test_autocomplete_cancelled_mid_flight() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/autocomplete-place"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "suggestions": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = client.autocomplete_place("hanoi", &token).await;
    assert!(matches!(result, Err(Error::Cancelled)), "got: {result:?}");
}

#[tokio::test]
async fn test_autocomplete_with_fired_token_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/autocomplete-place"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "suggestions": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let result = client.autocomplete_place("hanoi", &token).await;
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_geocode_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/geocode"))
        .and(query_param("address", "Phường 15, Quận 11, Việt Nam"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "lat": 10.7626, "lng": 106.6502 })),
        )
        .mount(&server)
        .await;

    let coords = client.geocode("Phường 15, Quận 11, Việt Nam").await.unwrap();
    assert!((coords.lat - 10.7626).abs() < f64::EPSILON);
    assert!((coords.lng - 106.6502).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_geocode_error_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/geocode"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Address not found" })),
        )
        .mount(&server)
        .await;

    let err = client.geocode("nowhere").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Address not found");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/places/geocode"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.geocode("anything").await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("oops")),
        "got: {err:?}"
    );
}
