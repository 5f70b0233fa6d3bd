// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API tests for network listing and mining control.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn enable_request(network_id: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/networks/{network_id}/enable"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!("{{\"userId\":\"{user_id}\"}}")))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_networks_covers_full_fleet() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let networks = body.as_array().unwrap();
    assert_eq!(networks.len(), 9);

    let ids: Vec<&str> = networks
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    for id in [
        "myst",
        "iotex",
        "bitcoin-signet",
        "helium-mobile",
        "foam",
        "sweatcoin",
        "stepn",
        "walken",
        "fitmint",
    ] {
        assert!(ids.contains(&id), "missing network {id}");
    }

    // Fresh state: nothing enabled, neutral multipliers
    for network in networks {
        assert_eq!(network["isEnabled"], false);
        assert_eq!(network["balance"], 0.0);
        assert_eq!(network["multiplier"], 1.0);
        assert!(network["tokenSymbol"].is_string());
    }
}

#[tokio::test]
async fn test_get_unknown_network_is_404() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks/dogecoin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_enable_disable_round_trip() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(enable_request("myst", "rider_1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["isEnabled"], true);
    assert_eq!(body["userId"], "rider_1");

    // Enabling again with the same user is harmless
    let response = app
        .clone()
        .oneshot(enable_request("myst", "rider_1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/networks/myst/disable")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["isEnabled"], false);

    // Disabling again is also harmless
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/networks/myst/disable")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_enable_rejects_empty_user_id() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(enable_request("myst", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_enable_rejects_oversized_user_id() {
    let (app, _state) = common::create_test_app().await;

    let long_user = "r".repeat(129);
    let response = app
        .oneshot(enable_request("myst", &long_user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_network_rewards_start_empty() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks/sweatcoin/rewards")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_security_headers_present_on_api_responses() {
    let (app, _state) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
