// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the reward networks and activity boosts.

use crate::error::{AppError, Result};
use crate::models::{ActivityBoost, ActivityData, MinerSnapshot, RewardRecord, TokenBalance};
use crate::services::network::RewardNetwork;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/networks", get(list_networks))
        .route("/api/networks/{id}", get(get_network))
        .route("/api/networks/{id}/rewards", get(get_network_rewards))
        .route("/api/networks/{id}/boost", get(get_network_boost))
        .route("/api/networks/{id}/enable", post(enable_network))
        .route("/api/networks/{id}/disable", post(disable_network))
        .route("/api/activities", post(submit_activity))
        .route("/api/balances", get(get_balances))
        .route("/api/boosts", get(list_boosts))
        .route("/api/boosts/active", get(get_active_boosts))
        .route("/api/boosts/{id}/activate", post(activate_boost))
        .route("/api/boosts/{id}/deactivate", post(deactivate_boost))
}

/// Look up a network service or 404.
fn network_service<'a>(
    state: &'a AppState,
    network_id: &str,
) -> Result<&'a Arc<dyn RewardNetwork>> {
    state
        .manager
        .service(network_id)
        .ok_or_else(|| AppError::NotFound(format!("Network {network_id} not found")))
}

// ─── Networks ────────────────────────────────────────────────

/// List every known network with its mining state.
async fn list_networks(State(state): State<Arc<AppState>>) -> Json<Vec<MinerSnapshot>> {
    Json(state.manager.snapshots().await)
}

/// One network's mining state.
async fn get_network(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
) -> Result<Json<MinerSnapshot>> {
    let service = network_service(&state, &network_id)?;
    Ok(Json(service.snapshot().await))
}

/// A network's full reward ledger, oldest first.
async fn get_network_rewards(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
) -> Result<Json<Vec<RewardRecord>>> {
    let service = network_service(&state, &network_id)?;
    Ok(Json(service.rewards().await))
}

/// The boost currently applied to a network, if any.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBoostResponse {
    pub network_id: String,
    pub multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<ActivityBoost>,
}

async fn get_network_boost(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
) -> Result<Json<NetworkBoostResponse>> {
    network_service(&state, &network_id)?;
    Ok(Json(NetworkBoostResponse {
        multiplier: state.boosts.multiplier_for(&network_id).await,
        boost: state.boosts.active_boost_for(&network_id).await,
        network_id,
    }))
}

// ─── Mining control ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnableRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Enable mining on a network for a user. Idempotent.
async fn enable_network(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
    Json(payload): Json<EnableRequest>,
) -> Result<Json<MinerSnapshot>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let service = network_service(&state, &network_id)?;
    service.enable(&payload.user_id).await?;
    Ok(Json(service.snapshot().await))
}

/// Disable mining on a network. Safe when already disabled.
async fn disable_network(
    State(state): State<Arc<AppState>>,
    Path(network_id): Path<String>,
) -> Result<Json<MinerSnapshot>> {
    let service = network_service(&state, &network_id)?;
    service.disable().await?;
    Ok(Json(service.snapshot().await))
}

// ─── Activity submission ─────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActivityResponse {
    /// Per-network acceptance, one entry per active network
    pub results: BTreeMap<String, bool>,
    /// Boosts this session pushed to 100% progress
    pub activated_boosts: Vec<ActivityBoost>,
}

/// Submit one completed session: update boost progress, then fan the
/// activity out to every active network. A boost the session itself
/// unlocks already applies to its rewards.
async fn submit_activity(
    State(state): State<Arc<AppState>>,
    Json(activity): Json<ActivityData>,
) -> Result<Json<SubmitActivityResponse>> {
    activity
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let now = Utc::now();

    let activated_boosts = state
        .boosts
        .update_activity_progress(
            activity.activity_type,
            activity.duration_secs_clamped(),
            Some(activity.distance_meters_clamped()),
            now,
        )
        .await;
    let results = state.manager.submit_to_all(&activity, now).await;

    tracing::info!(
        activity_id = %activity.id,
        accepted = results.values().filter(|accepted| **accepted).count(),
        networks = results.len(),
        "Activity submitted"
    );
    Ok(Json(SubmitActivityResponse {
        results,
        activated_boosts,
    }))
}

// ─── Balances ────────────────────────────────────────────────

/// Total holdings per token symbol across all networks.
async fn get_balances(State(state): State<Arc<AppState>>) -> Json<Vec<TokenBalance>> {
    Json(state.manager.total_balances().await)
}

// ─── Boosts ──────────────────────────────────────────────────

async fn list_boosts(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityBoost>> {
    Json(state.boosts.boosts().await)
}

async fn get_active_boosts(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityBoost>> {
    Json(state.boosts.active_boosts().await)
}

#[derive(Serialize)]
pub struct BoostActionResponse {
    pub success: bool,
}

/// Manually activate a catalog boost. `success: false` means it was
/// already running.
async fn activate_boost(
    State(state): State<Arc<AppState>>,
    Path(boost_id): Path<String>,
) -> Result<Json<BoostActionResponse>> {
    require_known_boost(&state, &boost_id).await?;
    let success = state.boosts.activate_boost(&boost_id, Utc::now()).await;
    Ok(Json(BoostActionResponse { success }))
}

/// Deactivate a running boost. `success: false` means it was not active.
async fn deactivate_boost(
    State(state): State<Arc<AppState>>,
    Path(boost_id): Path<String>,
) -> Result<Json<BoostActionResponse>> {
    require_known_boost(&state, &boost_id).await?;
    let success = state.boosts.deactivate_boost(&boost_id).await;
    Ok(Json(BoostActionResponse { success }))
}

async fn require_known_boost(state: &AppState, boost_id: &str) -> Result<()> {
    let known = state
        .boosts
        .boosts()
        .await
        .iter()
        .any(|boost| boost.id == boost_id);
    if known {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Boost {boost_id} not found")))
    }
}
