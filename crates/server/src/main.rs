//! Collate-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use collate_api::{
    BroadcastDispatcher, SubscriptionRegistry, middleware::AppState, router as api_router,
    streaming_handler,
};
use collate_common::Config;
use collate_core::{
    AggregationService, AuthService, CandidateService, ConstituencyService, PartyService,
    PollingStationService, RegionService, ResultService, UserService,
};
use collate_db::repositories::{
    CandidateRepository, ConstituencyRepository, PartyRepository, PollingStationRepository,
    UserRepository, VoteRecordRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "collate=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting collate-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = collate_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    collate_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let party_repo = PartyRepository::new(Arc::clone(&db));
    let constituency_repo = ConstituencyRepository::new(Arc::clone(&db));
    let station_repo = PollingStationRepository::new(Arc::clone(&db));
    let candidate_repo = CandidateRepository::new(Arc::clone(&db));
    let vote_record_repo = VoteRecordRepository::new(Arc::clone(&db));

    // Initialize services
    let auth_service = AuthService::new(user_repo.clone(), &config);
    let user_service = UserService::new(user_repo);
    let party_service = PartyService::new(party_repo.clone());
    let constituency_service = ConstituencyService::new(constituency_repo.clone());
    let polling_station_service =
        PollingStationService::new(station_repo.clone(), constituency_repo.clone());
    let candidate_service = CandidateService::new(
        candidate_repo.clone(),
        party_repo.clone(),
        constituency_repo.clone(),
    );
    let aggregation_service = AggregationService::new(
        candidate_repo.clone(),
        party_repo,
        constituency_repo.clone(),
        station_repo.clone(),
        vote_record_repo.clone(),
    );
    let region_service = RegionService::new(
        constituency_repo.clone(),
        station_repo.clone(),
        vote_record_repo.clone(),
    );

    // Initialize the subscription registry and the broadcast dispatcher,
    // then hand the dispatcher to the result service as its event publisher.
    let registry = SubscriptionRegistry::new();
    let dispatcher = Arc::new(BroadcastDispatcher::new(
        aggregation_service.clone(),
        registry.clone(),
        Duration::from_secs(config.broadcast.sweep_interval_secs),
    ));

    let result_service = ResultService::new(
        vote_record_repo,
        candidate_repo,
        station_repo,
        constituency_repo,
        dispatcher.clone(),
    );

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        party_service,
        constituency_service,
        polling_station_service,
        candidate_service,
        result_service,
        aggregation_service,
        region_service,
        registry,
    };

    // Build router
    let app = Router::new()
        .route("/streaming", get(streaming_handler))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            collate_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the broadcast event loop and periodic sweep
    dispatcher.start();

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dispatcher.stop();
    info!("Server shutdown complete");
    Ok(())
}
