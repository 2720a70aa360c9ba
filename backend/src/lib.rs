//! Review Desk - Business Onboarding Server
//!
//! Lets a signed-in user create a business profile. Authentication and
//! storage are delegated to the hosted backend; this server renders the
//! onboarding pages, keeps the session fresh and runs the create action.

use std::{sync::Arc, time::Duration};

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

use config::{LogConfig, StoreDriver};
use error::{AppError, AppResult};
use external::{SupabaseAuthClient, SupabaseRpcClient};
use handlers::Pages;
use services::{AuthProvider, BusinessStore, PgBusinessStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn BusinessStore>,
    pub pages: Arc<Pages>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn BusinessStore>,
        config: Config,
    ) -> AppResult<Self> {
        let pages = Pages::new()
            .map_err(|e| AppError::Configuration(format!("page templates: {}", e)))?;

        Ok(Self {
            auth,
            store,
            pages: Arc::new(pages),
            config: Arc::new(config),
        })
    }
}

/// Initialize tracing
pub fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "review_desk_server=debug,review_desk=debug,tower_http=debug,sqlx=warn".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect the collaborators named by the configuration
pub async fn build_state(config: Config) -> AppResult<AppState> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.supabase.request_timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

    let auth: Arc<dyn AuthProvider> = Arc::new(SupabaseAuthClient::new(http.clone(), &config.supabase));

    let store: Arc<dyn BusinessStore> = match config.store.driver {
        StoreDriver::Rest => Arc::new(SupabaseRpcClient::new(http, &config.supabase)),
        StoreDriver::Postgres => {
            let url = config.store.database_url.as_deref().ok_or_else(|| {
                AppError::Configuration(
                    "store.database_url is required by the postgres driver".to_string(),
                )
            })?;

            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.store.max_connections)
                .min_connections(config.store.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;
            tracing::info!("Database connection established");

            Arc::new(PgBusinessStore::new(db_pool))
        }
    };

    tracing::info!("Business store: {}", store.kind());

    AppState::new(auth, store, config)
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard_home))
        .route("/health", get(handlers::health_check))
        .nest("/dashboard", routes::dashboard_routes())
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
