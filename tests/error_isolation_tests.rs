// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fan-out isolation: one failing service must not take down a submission
//! for the others.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use shred_rewards::services::SimOracle;
use shred_rewards::store::RewardStore;
use std::sync::Arc;
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

async fn submit(app: &axum::Router, activity_id: &str) -> serde_json::Value {
    let activity = common::activity_json(activity_id, "skateboard", 900.0, 2000.0);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/activities")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(activity.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await
}

#[tokio::test]
async fn test_store_failure_in_one_network_does_not_break_fanout() {
    let store = Arc::new(common::PoisonableStore::new("network.iotex"));
    let (app, _state) = common::create_test_app_on(store.clone(), SimOracle::seeded(7)).await;

    enable(&app, "iotex").await;
    enable(&app, "sweatcoin").await;
    enable(&app, "walken").await;

    store.poison();
    let body = submit(&app, "act_1").await;

    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results["iotex"], false);
    assert_eq!(results["sweatcoin"], true);
    assert_eq!(results["walken"], true);

    // The failed write never reached the store; the healthy networks
    // recorded their rewards.
    let iotex: serde_json::Value =
        serde_json::from_str(&store.get("network.iotex").await.unwrap().unwrap()).unwrap();
    assert_eq!(iotex["isEnabled"], true);
    assert_eq!(iotex["rewards"].as_array().unwrap().len(), 0);

    let sweatcoin: serde_json::Value =
        serde_json::from_str(&store.get("network.sweatcoin").await.unwrap().unwrap()).unwrap();
    assert_eq!(sweatcoin["rewards"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failing_network_keeps_failing_without_wedging_the_rest() {
    let store = Arc::new(common::PoisonableStore::new("network.iotex"));
    let (app, _state) = common::create_test_app_on(store.clone(), SimOracle::seeded(7)).await;

    enable(&app, "iotex").await;
    enable(&app, "sweatcoin").await;
    store.poison();

    for activity_id in ["act_1", "act_2", "act_3"] {
        let body = submit(&app, activity_id).await;
        assert_eq!(body["results"]["iotex"], false);
        assert_eq!(body["results"]["sweatcoin"], true);
    }

    let sweatcoin: serde_json::Value =
        serde_json::from_str(&store.get("network.sweatcoin").await.unwrap().unwrap()).unwrap();
    assert_eq!(sweatcoin["rewards"].as_array().unwrap().len(), 3);
}
