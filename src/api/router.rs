use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_member, delete_member, get_member_by_id, get_member_by_identification,
    list_members, member_is_active, update_member,
};

/// Creates the API router with all member management endpoints
///
/// Command endpoints (Write operations):
/// - POST /members - Register a member
/// - PUT /members/:id - Update a member
/// - DELETE /members/:id - Deactivate a member (guarded by the accounts service)
///
/// Query endpoints (Read operations):
/// - GET /members - List all members
/// - GET /members/:id - Get member details
/// - GET /members/identification/:identification - Find by identification
/// - GET /members/:id/active - Whether the member exists and is active
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/:id",
            get(get_member_by_id)
                .put(update_member)
                .delete(delete_member),
        )
        .route(
            "/members/identification/:identification",
            get(get_member_by_identification),
        )
        .route("/members/:id/active", get(member_is_active))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
