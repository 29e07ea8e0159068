//! # EduConnect API
//!
//! The API crate provides the web server for the EduConnect tutoring
//! marketplace: accounts, session requests between students and tutors,
//! post-session feedback, directory search and the admin console.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Services**: Domain operations, each guarded by the authorization check
//! - **Middleware**: Caller identification, authorization and error mapping
//! - **Config**: Environment configuration
//!
//! Storage is reached only through the [`Store`] trait, so the same router
//! runs against PostgreSQL or the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication, authorization and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Domain operations behind the handlers
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use educonnect_db::Store;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::CALLER_HEADER;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use educonnect_api::ApiState;
/// use educonnect_db::MemoryStore;
///
/// let state = Arc::new(ApiState {
///     store: Arc::new(MemoryStore::new()),
///     admin_registration_code: None,
/// });
/// let app = educonnect_api::app(state);
/// ```
pub struct ApiState {
    /// Identity, session request and feedback storage
    pub store: Arc<dyn Store>,
    /// Code an admin registration must present; admin sign-up is closed when unset
    pub admin_registration_code: Option<String>,
}

/// Builds the application router with every route and the shared state attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration, login and profiles
        .merge(routes::accounts::routes())
        // Session requests and feedback
        .merge(routes::session::routes())
        // Directory search
        .merge(routes::directory::routes())
        // Admin console
        .merge(routes::admin::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(CALLER_HEADER),
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and store
///
/// Initializes logging, builds the router and serves it until the process
/// is stopped.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use educonnect_api::{config::ApiConfig, start_server};
///
/// let config = ApiConfig::from_env()?;
/// let store = educonnect_db::connect(&config.database_url, config.max_connections).await?;
/// start_server(config, store).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState {
        store,
        admin_registration_code: config.admin_registration_code.clone(),
    });
    if state.admin_registration_code.is_none() {
        info!("ADMIN_REGISTRATION_CODE is not set; admin registration is disabled");
    }

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout,
        ))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
