//! Admin dashboard HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{
    available_actions, ActivityEntry, AdminBoard, Customer, CustomerStatus, DashboardStats,
    Payment, PaymentStatus, ProviderId, ProviderStatus, ProviderView, ReservationId,
    SessionContext, StatusCounts, StatusFilter, Transition,
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentSession;
use crate::services::moderation::require_admin;
use crate::services::{DashboardService, ModerationService};
use crate::AppState;

/// Customer with its derived status
#[derive(Serialize)]
pub struct CustomerView<'a> {
    #[serde(flatten)]
    pub customer: &'a Customer,
    pub status: CustomerStatus,
}

impl<'a> From<&'a Customer> for CustomerView<'a> {
    fn from(customer: &'a Customer) -> Self {
        Self {
            customer,
            status: customer.status(),
        }
    }
}

/// Full dashboard payload
#[derive(Serialize)]
pub struct DashboardResponse<'a> {
    pub stats: &'a DashboardStats,
    pub status_counts: StatusCounts,
    pub providers: Vec<ProviderView<'a>>,
    pub customers: Vec<CustomerView<'a>>,
    pub payments: &'a [Payment],
    pub activity: Vec<&'a ActivityEntry>,
}

impl<'a> From<&'a AdminBoard> for DashboardResponse<'a> {
    fn from(board: &'a AdminBoard) -> Self {
        Self {
            stats: board.stats(),
            status_counts: board.status_counts(),
            providers: board.providers().iter().map(ProviderView::from).collect(),
            customers: board.customers().iter().map(CustomerView::from).collect(),
            payments: board.payments(),
            activity: board.activity.entries().collect(),
        }
    }
}

/// Provider with the actions offered for its status
#[derive(Serialize)]
pub struct ProviderResponse<'a> {
    #[serde(flatten)]
    pub provider: ProviderView<'a>,
    pub actions: &'static [Transition],
}

/// Result of a moderation action
#[derive(Serialize)]
pub struct TransitionResponse {
    pub id: ProviderId,
    pub previous_status: ProviderStatus,
    pub status: ProviderStatus,
    pub pending_approvals: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProviderListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

/// Lock the caller's board, loading it on first use
async fn session_board(
    state: &AppState,
    ctx: &SessionContext,
) -> AppResult<OwnedMutexGuard<AdminBoard>> {
    let mut board = state.sessions.acquire(ctx).await?;
    if !board.is_loaded() {
        DashboardService::new(state.store.clone())
            .load(ctx, &mut board)
            .await?;
    }
    Ok(board)
}

/// Like `session_board`, re-reading providers on an already loaded board
async fn fresh_board(
    state: &AppState,
    ctx: &SessionContext,
) -> AppResult<OwnedMutexGuard<AdminBoard>> {
    let mut board = state.sessions.acquire(ctx).await?;
    let service = DashboardService::new(state.store.clone());
    if board.is_loaded() {
        service.refresh_providers(ctx, &mut board).await?;
    } else {
        service.load(ctx, &mut board).await?;
    }
    Ok(board)
}

/// Reload and return the whole dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> AppResult<Json<serde_json::Value>> {
    let mut board = state.sessions.acquire(&ctx).await?;
    let service = DashboardService::new(state.store.clone());

    // A failed reload keeps serving what was loaded before
    if let Err(e) = service.load(&ctx, &mut board).await {
        if !board.is_loaded() {
            return Err(e);
        }
    }

    Ok(Json(serde_json::to_value(DashboardResponse::from(&*board))
        .map_err(anyhow::Error::from)?))
}

/// List providers, optionally filtered by status
pub async fn list_providers(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Query(query): Query<ProviderListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let filter: StatusFilter = query
        .status
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: String| AppError::validation("status", e))?;

    let board = fresh_board(&state, &ctx).await?;
    let providers: Vec<ProviderView> = board
        .filter_providers(filter)
        .into_iter()
        .map(ProviderView::from)
        .collect();

    Ok(Json(serde_json::json!({ "providers": providers })))
}

/// Provider detail, re-read from the store with its service record
pub async fn get_provider(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(id): Path<ProviderId>,
) -> AppResult<Json<serde_json::Value>> {
    let mut board = session_board(&state, &ctx).await?;
    let provider = DashboardService::new(state.store.clone())
        .provider_detail(&ctx, &mut board, id)
        .await?;

    let response = ProviderResponse {
        provider: ProviderView::from(provider),
        actions: available_actions(provider.status()),
    };
    Ok(Json(serde_json::to_value(response).map_err(anyhow::Error::from)?))
}

/// Apply a moderation transition (`approve`, `reject`, `reset`, `deactivate`)
pub async fn transition_provider(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path((id, action)): Path<(ProviderId, String)>,
) -> AppResult<Json<TransitionResponse>> {
    let transition = Transition::parse(&action)
        .ok_or_else(|| AppError::NotFound(format!("Action {}", action)))?;

    let mut board = session_board(&state, &ctx).await?;
    let outcome = ModerationService::new(state.store.clone())
        .transition(&ctx, &mut board, id, transition)
        .await?;

    Ok(Json(TransitionResponse {
        id,
        previous_status: outcome.previous,
        status: outcome.current,
        pending_approvals: board.stats().pending_approvals,
    }))
}

/// Delete a provider
pub async fn delete_provider(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(id): Path<ProviderId>,
) -> AppResult<StatusCode> {
    let mut board = session_board(&state, &ctx).await?;
    ModerationService::new(state.store.clone())
        .delete(&ctx, &mut board, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Verify or suspend a customer
pub async fn update_customer_status(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> AppResult<Json<serde_json::Value>> {
    let status: CustomerStatus = input
        .status
        .parse()
        .map_err(|e: String| AppError::validation("status", e))?;

    let mut board = session_board(&state, &ctx).await?;
    let customer = DashboardService::new(state.store.clone())
        .set_customer_status(&ctx, &mut board, id, status)
        .await?;

    Ok(Json(serde_json::to_value(CustomerView::from(customer))
        .map_err(anyhow::Error::from)?))
}

/// Complete or suspend a payment
pub async fn update_payment_status(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(id): Path<ReservationId>,
    Json(input): Json<StatusInput>,
) -> AppResult<Json<Payment>> {
    let status: PaymentStatus = input
        .status
        .parse()
        .map_err(|e: String| AppError::validation("status", e))?;

    let mut board = session_board(&state, &ctx).await?;
    let payment = DashboardService::new(state.store.clone())
        .set_payment_status(&ctx, &mut board, id, status)
        .await?;

    Ok(Json(payment.clone()))
}

/// Drop the caller's dashboard session, e.g. on logout
pub async fn close_session(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> AppResult<StatusCode> {
    require_admin(&ctx)?;

    if state.sessions.close(ctx.user_id).await {
        tracing::debug!(admin_id = %ctx.user_id, "Dashboard session closed");
    }
    Ok(StatusCode::NO_CONTENT)
}
