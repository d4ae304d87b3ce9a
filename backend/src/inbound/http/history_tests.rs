//! Tests for the password-gated history handlers.

use actix_web::{http::StatusCode, test};
use chrono::{DateTime, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{AccessGate, RouteId};
use crate::inbound::http::test_utils::{MockPorts, TEST_PASSWORD, call_api};

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

#[rstest]
#[case::correct(json!({ "password": TEST_PASSWORD }), StatusCode::OK)]
#[case::wrong(json!({ "password": "guess" }), StatusCode::UNAUTHORIZED)]
#[case::missing(json!({}), StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn verify_checks_the_password(#[case] body: Value, #[case] expected: StatusCode) {
    let response = call_api(
        MockPorts::default().into_state(),
        post("/api/history/verify", body),
    )
    .await;
    assert_eq!(response.status(), expected);
}

#[rstest]
#[case(json!({ "password": "anything" }))]
#[case(json!({}))]
#[actix_web::test]
async fn verify_without_a_configured_secret_is_a_server_error(#[case] body: Value) {
    let state = MockPorts::default().into_state_with(AccessGate::new(None));
    let response = call_api(state, post("/api/history/verify", body)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "misconfigured");
}

#[actix_web::test]
async fn list_returns_entries_for_the_day() {
    let mut ports = MockPorts::default();
    ports
        .history
        .expect_list()
        .withf(|date| date.to_string() == "2025-12-11")
        .returning(|_| {
            Ok(vec![HistoryEntry {
                route_id: RouteId::new("ab12cd34").expect("route id"),
                created_at: at("2025-12-11T09:30:00Z"),
                order_count: 3,
            }])
        });

    let response = call_api(
        ports.into_state(),
        post(
            "/api/history/list",
            json!({ "password": TEST_PASSWORD, "date": "2025-12-11" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["records"][0]["routeId"], "ab12cd34");
    assert_eq!(body["records"][0]["orderCount"], 3);
}

#[actix_web::test]
async fn list_rejects_the_wrong_password_before_touching_the_index() {
    let mut ports = MockPorts::default();
    ports.history.expect_list().never();

    let response = call_api(
        ports.into_state(),
        post(
            "/api/history/list",
            json!({ "password": "guess", "date": "2025-12-11" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::missing(json!({ "password": TEST_PASSWORD }))]
#[case::malformed(json!({ "password": TEST_PASSWORD, "date": "11/12/2025" }))]
#[actix_web::test]
async fn list_requires_an_iso_date(#[case] body: Value) {
    let response = call_api(
        MockPorts::default().into_state(),
        post("/api/history/list", body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn detail_wraps_the_route_document() {
    let mut ports = MockPorts::default();
    ports.history.expect_detail().returning(|route_id| {
        Ok(RouteDocument {
            route_id: route_id.clone(),
            created_at: at("2025-12-11T09:30:00Z"),
            orders: Vec::new(),
        })
    });

    let response = call_api(
        ports.into_state(),
        post(
            "/api/history/detail",
            json!({ "password": TEST_PASSWORD, "routeId": "ab12cd34" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["routeId"], "ab12cd34");
}

#[actix_web::test]
async fn delete_cascades_through_the_route_port() {
    let mut ports = MockPorts::default();
    ports
        .routes
        .expect_delete()
        .withf(|route_id, date| route_id.as_str() == "ab12cd34" && date.to_string() == "2025-12-11")
        .times(1)
        .returning(|_, _| Ok(()));

    let response = call_api(
        ports.into_state(),
        post(
            "/api/history/delete",
            json!({ "password": TEST_PASSWORD, "routeId": "ab12cd34", "date": "2025-12-11" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": true }));
}

#[actix_web::test]
async fn delete_requires_a_route_id() {
    let mut ports = MockPorts::default();
    ports.routes.expect_delete().never();

    let response = call_api(
        ports.into_state(),
        post(
            "/api/history/delete",
            json!({ "password": TEST_PASSWORD, "date": "2025-12-11" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "routeId");
}
