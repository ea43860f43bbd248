pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod serializers;
pub mod urls;
pub mod views;

use std::sync::Arc;

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey};
use salary_ml::ModelInvoker;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub use config::{AppCfg, JwtCfg};
pub use urls::router;

/// Everything a handler needs; all of it is fixed at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_enc: Arc<EncodingKey>,
    pub jwt_dec: Arc<DecodingKey>,
    pub jwt_cfg: JwtCfg,
    pub model: ModelInvoker,
}

impl AppState {
    pub fn new(db: DatabaseConnection, secret: &[u8], jwt_cfg: JwtCfg, model: ModelInvoker) -> Self {
        Self {
            db,
            jwt_enc: Arc::new(EncodingKey::from_secret(secret)),
            jwt_dec: Arc::new(DecodingKey::from_secret(secret)),
            jwt_cfg,
            model,
        }
    }
}

/// Open the database named by `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    info!("database connected");
    Ok(db)
}

/// Ensure DB schema is up-to-date (calls migration crate).
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<()> {
    use migration::Migrator;
    use sea_orm_migration::migrator::MigratorTrait;
    Migrator::up(db, None).await?;
    info!("schema up to date");
    Ok(())
}
