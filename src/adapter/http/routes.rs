use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::{CampaignId, DonationId, DonorId, GatewayReference};
use crate::service::DonationRequest;

use super::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/donations", post(create_donation))
        .route("/donations/confirm", post(confirm_donation))
        .route("/donations/{id}", get(donation))
        .route("/donations/{id}/receipt", get(donation_receipt))
        .route("/campaigns/{id}/progress", get(campaign_progress))
        .route("/campaigns/{id}/donations", get(campaign_donations))
        .route("/donors/{id}/donations", get(donor_history))
        .route("/webhooks/gateway", post(gateway_webhook))
        .with_state(state)
}

async fn create_donation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DonationRequest>,
) -> Response {
    match state.initiator.create_donation_intent(request).await {
        Ok(intent) => (StatusCode::CREATED, Json(intent)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
struct ConfirmRequest {
    gateway_reference: GatewayReference,
    donation_id: DonationId,
}

async fn confirm_donation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfirmRequest>,
) -> Response {
    match state
        .reconciler
        .confirm(&request.gateway_reference, &request.donation_id)
        .await
    {
        Ok(confirmation) => (StatusCode::OK, Json(confirmation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Provider notification endpoint.
///
/// Every `Ignored:*` reconciliation outcome is acknowledged with 200 so the
/// provider stops redelivering; only gateway/storage errors answer 5xx,
/// relying on the provider's at-least-once redelivery (safe, because
/// reconciliation is idempotent). A bad signature is the caller's fault: 400.
async fn gateway_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("gateway-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let event = match state.gateway.verify_event(&body, signature) {
        Ok(event) => event,
        Err(e) => return e.into_response(),
    };

    match state
        .reconciler
        .reconcile(&event.reference, event.status)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn donation(State(state): State<Arc<AppState>>, Path(id): Path<DonationId>) -> Response {
    match state.queries.donation(&id).await {
        Ok(Some(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn donation_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DonationId>,
) -> Response {
    match state.queries.donation_receipt(&id).await {
        Ok(Some(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn campaign_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CampaignId>,
) -> Response {
    match state.queries.campaign_progress(&id).await {
        Ok(Some(progress)) => (StatusCode::OK, Json(progress)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn campaign_donations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CampaignId>,
) -> Response {
    match state.queries.campaign_donations(&id).await {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn donor_history(State(state): State<Arc<AppState>>, Path(id): Path<DonorId>) -> Response {
    match state.queries.donor_history(&id).await {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => e.into_response(),
    }
}
