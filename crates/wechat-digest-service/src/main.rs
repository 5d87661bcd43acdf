use clap::Parser;
use std::sync::{Arc, Mutex};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use wechat_digest_service::{
    AppState, DefaultAppState,
    config::Config,
    db,
    repositories::{KeywordRepository, keywords::default_keywords},
    routes::create_router,
    run_guard::RunGuard,
    scrape::SearchClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wechat_digest_service=debug".parse().unwrap()),
        )
        .init();

    let config = Config::parse();

    let connection = db::establish_connection(&config.database_url).unwrap_or_else(|err| {
        error!(database_url = %config.database_url, error = %err, "Failed to open database");
        std::process::exit(1);
    });

    info!(database_url = %config.database_url, "Connected to database");

    let fetcher = SearchClient::new(config.search_base_url.clone(), config.fetch_timeout())
        .unwrap_or_else(|err| {
            error!(error = %err, "Failed to build search client");
            std::process::exit(1);
        });

    let settings = config.settings();
    if settings.cron_secret.is_none() {
        warn!("CRON_SECRET is not set, the ingestion trigger is open to anyone");
    }
    if settings.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set, keyword and subscription writes are disabled");
    }

    let app_state = DefaultAppState::new(Arc::new(Mutex::new(connection)), fetcher, settings);

    if config.seed_default_keywords {
        match app_state.keyword_repo().seed_defaults(&default_keywords()).await {
            Ok(0) => {}
            Ok(seeded) => info!(seeded, "Seeded default keywords"),
            Err(err) => warn!(error = %err, "Failed to seed default keywords"),
        }
    }

    let run_guard = app_state.run_guard().clone();

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %config.bind_address, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(bind_address = %config.bind_address, "Server running");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(run_guard));

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal(run_guard: RunGuard) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, refusing new ingestion runs");
    run_guard.start_shutdown();

    if run_guard.is_running() {
        info!("Waiting for the active ingestion run to finish");
    }
    run_guard.idle().await;
    info!("Graceful shutdown completed");
}
