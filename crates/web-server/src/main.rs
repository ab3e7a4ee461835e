use database::DbRepository;
use std::path::Path;
use web_server::AppState;

// This main function is the entry point when running `cargo run -p web-server`.
// It wires settings, logging and the database pool, then hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = configuration::load_config(Path::new("config.toml"))?;
    let _log_guard = configuration::logging::init(&settings.logging)?;

    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;

    let state = AppState::new(DbRepository::new(db_pool), settings.analysis.clone());
    web_server::run_server(settings.server.socket_addr()?, state).await
}
