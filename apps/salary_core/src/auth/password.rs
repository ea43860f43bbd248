use std::sync::OnceLock;

use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm as ArgonAlgorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tokio::task;
use tracing::warn;

fn argon() -> Result<Argon2<'static>, argon2::Error> {
    // Argon2id, ~19MB mem, 2 iters
    let params = Params::new(19456, 2, 1, None)?;
    Ok(Argon2::new(ArgonAlgorithm::Argon2id, Version::V0x13, params))
}

/// Hash with a fresh random salt; the result is a PHC string.
pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(argon()?.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// A stored hash that does not parse counts as a mismatch.
pub fn verify_password(phc: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(phc) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    // params come from the PHC string itself
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash of a throwaway password with the production params. Checked when a
/// login names an unknown user so both failures cost one Argon2 run.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("dummy-password-for-unknown-users").unwrap_or_default())
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, anyhow::Error> {
    task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
}

/// [`verify_password`] on the blocking pool. With no stored hash the dummy
/// hash is verified instead and the result is always `false`.
pub async fn verify_password_blocking(
    phc: Option<String>,
    password: String,
) -> Result<bool, anyhow::Error> {
    task::spawn_blocking(move || match phc {
        Some(phc) => verify_password(&phc, &password),
        None => {
            verify_password(dummy_hash(), &password);
            false
        }
    })
    .await
    .context("password verification task failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_uses_production_params() {
        let parsed = PasswordHash::new(dummy_hash()).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(parsed.params.get_decimal("m"), Some(19456));
        assert_eq!(parsed.params.get_decimal("t"), Some(2));
    }

    #[tokio::test]
    async fn blocking_wrappers() {
        let phc = hash_password_blocking("secret1".into()).await.unwrap();
        assert!(verify_password_blocking(Some(phc.clone()), "secret1".into()).await.unwrap());
        assert!(!verify_password_blocking(Some(phc), "wrong".into()).await.unwrap());
        // unknown user never verifies, whatever the password
        assert!(!verify_password_blocking(None, "dummy-password-for-unknown-users".into())
            .await
            .unwrap());
    }

    #[test]
    fn hash_then_verify() {
        let phc = hash_password("correct horse").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password(&phc, "correct horse"));
        assert!(!verify_password(&phc, "battery staple"));
    }

    #[test]
    fn salted_per_call() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password(&a, "same"));
        assert!(verify_password(&b, "same"));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", "anything"));
    }
}
