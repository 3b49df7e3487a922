//! Provider self-service HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::{OwnerBooking, ProfileUpdate, ProviderView, Visit, VisitId, VisitStatus};

use crate::error::AppResult;
use crate::middleware::CurrentSession;
use crate::services::OwnerService;
use crate::AppState;

/// Visit request with its display status
#[derive(Serialize)]
pub struct VisitView {
    #[serde(flatten)]
    pub visit: Visit,
    pub status: VisitStatus,
}

impl From<Visit> for VisitView {
    fn from(visit: Visit) -> Self {
        let status = visit.status();
        Self { visit, status }
    }
}

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> AppResult<Json<serde_json::Value>> {
    let provider = OwnerService::new(state.store.clone()).profile(&ctx).await?;
    Ok(Json(serde_json::to_value(ProviderView::from(&provider))
        .map_err(anyhow::Error::from)?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<serde_json::Value>> {
    let provider = OwnerService::new(state.store.clone())
        .update_profile(&ctx, &update)
        .await?;
    Ok(Json(serde_json::to_value(ProviderView::from(&provider))
        .map_err(anyhow::Error::from)?))
}

pub async fn list_visits(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> AppResult<Json<serde_json::Value>> {
    let visits: Vec<VisitView> = OwnerService::new(state.store.clone())
        .visits(&ctx)
        .await?
        .into_iter()
        .map(VisitView::from)
        .collect();
    Ok(Json(serde_json::json!({ "visits": visits })))
}

pub async fn accept_visit(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(id): Path<VisitId>,
) -> AppResult<Json<VisitView>> {
    let visit = OwnerService::new(state.store.clone())
        .accept_visit(&ctx, id)
        .await?;
    Ok(Json(VisitView::from(visit)))
}

pub async fn list_reservations(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> AppResult<Json<serde_json::Value>> {
    let reservations: Vec<OwnerBooking> = OwnerService::new(state.store.clone())
        .bookings(&ctx)
        .await?;
    Ok(Json(serde_json::json!({ "reservations": reservations })))
}
