//! Signet server binary.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use signet::adapters::email::{ResendConfig, ResendMailer};
use signet::adapters::http::{access_routes, AccessHandlers};
use signet::adapters::postgres::{PostgresAccessSessionStore, PostgresProposalStore};
use signet::adapters::storage::{SupabaseObjectStore, SupabaseStorageConfig};
use signet::adapters::throttle::InMemoryRequestThrottle;
use signet::application::{
    AccessPolicy, AssetUrlService, CountersignHandler, RequestAccessCodeHandler,
    VerifyAccessCodeHandler,
};
use signet::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let pool = match connect_database(&config).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "Database startup failed");
            std::process::exit(1);
        }
    };

    let app = build_router(&config, pool);

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(error = %err, "Invalid bind address");
            std::process::exit(1);
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "signet listening"
    );

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "Server terminated");
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect_database(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    Ok(pool)
}

fn build_router(config: &AppConfig, pool: PgPool) -> Router {
    let proposals = Arc::new(PostgresProposalStore::new(pool.clone()));
    let sessions = Arc::new(PostgresAccessSessionStore::new(pool));
    let object_store = Arc::new(SupabaseObjectStore::new(SupabaseStorageConfig::new(
        config.storage.url.clone(),
        config.storage.service_key.clone(),
    )));
    let mailer = Arc::new(ResendMailer::new(ResendConfig::new(
        config.email.resend_api_key.clone(),
        config.email.from_header(),
    )));
    let throttle = Arc::new(InMemoryRequestThrottle::new(
        config.access.request_limit,
        config.access.request_window_secs,
    ));

    let policy = AccessPolicy {
        code_secret: SecretString::new(config.access.code_secret.clone()),
        code_ttl_secs: config.access.code_ttl_secs,
        code_length: config.access.code_length as usize,
        max_attempts: config.access.max_attempts,
        reveal_code: config.access.reveal_code,
    };

    let asset_urls = Arc::new(AssetUrlService::new(
        object_store.clone(),
        config.storage.signatures_bucket.clone(),
        u64::from(config.storage.signed_url_ttl_secs),
    ));

    let request_code_handler = Arc::new(RequestAccessCodeHandler::new(
        proposals.clone(),
        sessions.clone(),
        mailer,
        throttle,
        policy.clone(),
    ));
    let verify_code_handler = Arc::new(VerifyAccessCodeHandler::new(
        proposals.clone(),
        sessions,
        asset_urls.clone(),
        policy,
    ));
    let countersign_handler = Arc::new(CountersignHandler::new(
        proposals,
        object_store,
        asset_urls,
        config.storage.signatures_bucket.clone(),
    ));

    let handlers = AccessHandlers::new(
        request_code_handler,
        verify_code_handler,
        countersign_handler,
    );

    Router::new()
        .nest("/api/public/proposals", access_routes(handlers))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(build_cors(&config.server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn build_cors(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // The proposal endpoints are reached from links shared over
        // email, so an unset origin list means serve any origin.
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    }
}

async fn health() -> &'static str {
    "ok"
}
