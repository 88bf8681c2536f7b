pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use practice_core::{get_algorithm, SpacedRepetitionAlgorithm};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, CorsOrigins};
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
}

impl AppState {
    /// Build state with the scheduler named by `config.scheduling_algorithm`
    pub fn new(db: Database, config: Config) -> anyhow::Result<Self> {
        let algorithm = get_algorithm(&config.scheduling_algorithm).ok_or_else(|| {
            anyhow::anyhow!("unknown scheduling algorithm '{}'", config.scheduling_algorithm)
        })?;

        tracing::info!("Using {} scheduling", algorithm.name());

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            algorithm: Arc::from(algorithm),
        })
    }
}

/// Build the full router for the given state
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Problem routes
        .route(
            "/api/problems",
            get(routes::problems::list).post(routes::problems::create),
        )
        .route("/api/problems/tags", get(routes::problems::tags))
        .route(
            "/api/problems/:id",
            get(routes::problems::get)
                .put(routes::problems::update)
                .delete(routes::problems::delete),
        )
        // Review routes
        .route("/api/reviews", post(routes::reviews::submit))
        .route("/api/reviews/due", get(routes::reviews::due))
        .route("/api/reviews/history", get(routes::reviews::history))
        .route("/api/reviews/stats", get(routes::reviews::stats))
        .route("/api/reviews/:problem_id/reset", put(routes::reviews::reset))
        // Import routes
        .route("/api/import/problems", post(routes::import::problems))
        .route("/api/import/starter", post(routes::import::starter))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::permissive(),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let app = build_router(AppState::new(db, config)?);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
