use analyzer::ProfitPotentialOrchestrator;
use axum::{
    routing::get,
    Router,
};
use configuration::AnalysisConfig;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub orchestrator: ProfitPotentialOrchestrator<DbRepository>,
}

impl AppState {
    pub fn new(db_repo: DbRepository, analysis: AnalysisConfig) -> Self {
        let orchestrator = ProfitPotentialOrchestrator::new(db_repo.clone(), analysis);
        Self {
            db_repo,
            orchestrator,
        }
    }
}

/// Builds the application router with its middleware.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/ohlcv/:ticker/:start_date/:end_date",
            get(handlers::analyze_profit_potential),
        )
        .route(
            "/api/ohlcv/:ticker/:start_date/:end_date/:direction",
            get(handlers::analyze_adjacent_period),
        )
        .route(
            "/api/stocks",
            get(handlers::list_stocks).post(handlers::create_stock),
        )
        .route(
            "/api/stocks/:ticker",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::delete_stock),
        )
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `addr` until the process is stopped.
///
/// The caller owns the database pool inside `state`; tracing must already be
/// initialized.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
