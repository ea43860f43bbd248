use std::net::SocketAddr;

use dotenvy::dotenv;
use salary_core::{connect, ensure_schema, router, AppCfg, AppState};
use salary_ml::ModelInvoker;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let cfg = AppCfg::from_env()?;
    info!(?cfg, "configuration loaded");

    let db = connect(&cfg.database_url).await?;
    ensure_schema(&db).await?;

    // a missing or broken artifact leaves the service up with /predict returning 503
    let model = ModelInvoker::load(&cfg.model_path);

    let state = AppState::new(db, cfg.secret_key.as_bytes(), cfg.jwt.clone(), model);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
