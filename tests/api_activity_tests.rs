// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API tests for activity submission fan-out and balance aggregation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn enable(app: &axum::Router, network_id: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/networks/{network_id}/enable"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"userId":"rider_1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn submit_request(activity: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/activities")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(activity.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_submission_fans_out_to_enabled_networks_only() {
    let (app, _state) = common::create_test_app().await;
    enable(&app, "iotex").await;
    enable(&app, "sweatcoin").await;

    // Short enough that no boost threshold is reached.
    let activity = common::activity_json("act_1", "skateboard", 900.0, 2000.0);
    let response = app.clone().oneshot(submit_request(&activity)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results["iotex"], true);
    assert_eq!(results["sweatcoin"], true);
    assert_eq!(body["activatedBoosts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_rewards_follow_each_network_formula() {
    let (app, _state) = common::create_test_app().await;
    enable(&app, "iotex").await;
    enable(&app, "sweatcoin").await;

    // 900 s (0.25 h), 2000 m: iotex pays 0.25*10 + 2*2 = 6.5 IOTX,
    // sweatcoin pays 2000 * 1.31 / 1000 = 2.62 SWEAT.
    let activity = common::activity_json("act_1", "skateboard", 900.0, 2000.0);
    app.clone()
        .oneshot(submit_request(&activity))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/networks/iotex")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert!((body["balance"].as_f64().unwrap() - 6.5).abs() < 1e-9);
    assert_eq!(body["rewardCount"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks/sweatcoin/rewards")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let rewards = common::body_json(response).await;
    let rewards = rewards.as_array().unwrap();
    assert_eq!(rewards.len(), 1);
    assert!((rewards[0]["amount"].as_f64().unwrap() - 2.62).abs() < 1e-9);
    assert_eq!(rewards[0]["activityId"], "act_1");
    assert!(rewards[0]["txHash"].as_str().unwrap().starts_with("0x"));
}

#[tokio::test]
async fn test_balances_aggregate_per_token_symbol() {
    let (app, _state) = common::create_test_app().await;
    enable(&app, "iotex").await;
    enable(&app, "walken").await;

    let activity = common::activity_json("act_1", "skateboard", 900.0, 2000.0);
    app.clone()
        .oneshot(submit_request(&activity))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/balances")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let balances = body.as_array().unwrap();

    let amount_of = |symbol: &str| {
        balances
            .iter()
            .find(|b| b["symbol"] == symbol)
            .map(|b| b["amount"].as_f64().unwrap())
    };
    assert!((amount_of("IOTX").unwrap() - 6.5).abs() < 1e-9);
    // 15 minutes at 0.1 WLKN/min
    assert!((amount_of("WLKN").unwrap() - 1.5).abs() < 1e-9);
    // Networks that never earned still report a zero bucket
    assert_eq!(amount_of("MYST").unwrap(), 0.0);
}

#[tokio::test]
async fn test_submission_rejects_blank_identity() {
    let (app, _state) = common::create_test_app().await;

    let activity = common::activity_json("", "skateboard", 900.0, 2000.0);
    let response = app.oneshot(submit_request(&activity)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submission_with_nothing_enabled_is_empty() {
    let (app, _state) = common::create_test_app().await;

    let activity = common::activity_json("act_1", "skateboard", 900.0, 2000.0);
    let response = app.oneshot(submit_request(&activity)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["results"].as_object().unwrap().len(), 0);
}

#[tokio::test]
async fn test_garbage_metrics_clamp_to_zero_reward() {
    let (app, _state) = common::create_test_app().await;
    enable(&app, "sweatcoin").await;

    let mut activity = common::activity_json("act_1", "skateboard", 900.0, 2000.0);
    activity["distanceMeters"] = serde_json::json!(-500.0);
    activity["durationSecs"] = serde_json::json!(-60.0);

    let response = app.clone().oneshot(submit_request(&activity)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    // Zero computed reward means nothing was earned, not an error.
    assert_eq!(body["results"]["sweatcoin"], false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/networks/sweatcoin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let snapshot = common::body_json(response).await;
    assert_eq!(snapshot["balance"], 0.0);
}
