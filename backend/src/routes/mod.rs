//! Route definitions for Review Desk

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{handlers, AppState};

/// Dashboard pages and the onboarding action
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard_home))
        .route(
            "/create-business",
            get(handlers::create_business_page).merge(
                post(handlers::create_business)
                    .layer(CatchPanicLayer::custom(handlers::action_panic_response)),
            ),
        )
        .route("/businesses/:business_id", get(handlers::business_dashboard))
}
