use std::{env, fmt, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use chrono::Duration as ChronoDuration;
use jsonwebtoken::Algorithm;
use tracing::warn;

const DEV_SECRET: &str = "dev-only-secret-change-this-in-production";

#[derive(Clone, Debug)]
pub struct JwtCfg {
    /// HMAC signing algorithm (default HS256). Override with JWT_ALGORITHM.
    pub algorithm: Algorithm,
    /// Access token TTL (default 30 minutes). Override with ACCESS_TOKEN_EXPIRE_MINUTES.
    pub access_ttl: ChronoDuration,
}

impl Default for JwtCfg {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            access_ttl: ChronoDuration::minutes(30),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct AppCfg {
    pub database_url: String,
    pub secret_key: String,
    pub jwt: JwtCfg,
    pub model_path: PathBuf,
    pub port: u16,
}

impl AppCfg {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://./salary_predictor.db?mode=rwc".into());

        let secret_key = match lookup("SECRET_KEY") {
            Some(s) if s.is_empty() => bail!("SECRET_KEY must not be empty"),
            Some(s) => s,
            None => {
                warn!("SECRET_KEY not set, using the development secret");
                DEV_SECRET.into()
            }
        };

        let algorithm = lookup("JWT_ALGORITHM")
            .map(|s| parse_algorithm(&s))
            .transpose()?
            .unwrap_or(Algorithm::HS256);

        let expire_minutes: i64 = parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", &lookup, 30)?;
        if expire_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("trained_models").join("salary_model.json"));

        let port = parse_or("PORT", &lookup, 8000)?;

        Ok(Self {
            database_url,
            secret_key,
            jwt: JwtCfg {
                algorithm,
                access_ttl: ChronoDuration::minutes(expire_minutes),
            },
            model_path,
            port,
        })
    }
}

// never print the secret
impl fmt::Debug for AppCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCfg")
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("jwt", &self.jwt)
            .field("model_path", &self.model_path)
            .field("port", &self.port)
            .finish()
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

/// Tokens are signed with a shared secret, so only the HMAC family applies.
pub fn parse_algorithm(raw: &str) -> Result<Algorithm> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("unsupported JWT_ALGORITHM {other:?} (expected HS256, HS384 or HS512)"),
    }
}
