//! Route definitions for the Wedding Marketplace server

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - admin dashboard
        .nest("/admin", admin_routes(state.clone()))
        // Protected routes - provider self-service
        .nest("/owner", owner_routes(state))
}

/// Admin dashboard routes (protected)
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/session", delete(handlers::close_session))
        .route("/providers", get(handlers::list_providers))
        .route(
            "/providers/:id",
            get(handlers::get_provider).delete(handlers::delete_provider),
        )
        .route("/providers/:id/:action", post(handlers::transition_provider))
        .route("/customers/:id/status", put(handlers::update_customer_status))
        .route("/payments/:id/status", put(handlers::update_payment_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Provider self-service routes (protected)
fn owner_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::owner::get_profile).put(handlers::owner::update_profile),
        )
        .route("/visits", get(handlers::owner::list_visits))
        .route("/visits/:id/accept", post(handlers::owner::accept_visit))
        .route("/reservations", get(handlers::owner::list_reservations))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
