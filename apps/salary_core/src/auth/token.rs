use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header as JwtHeader, Validation};

use crate::config::JwtCfg;
use crate::serializers::user_auth::Claims;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Sign a token for `username` that expires `cfg.access_ttl` after `now`.
pub fn issue_at(
    username: &str,
    enc: &EncodingKey,
    cfg: &JwtCfg,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: (now + cfg.access_ttl).timestamp(),
    };
    jsonwebtoken::encode(&JwtHeader::new(cfg.algorithm), &claims, enc)
}

/// Check the signature and expiry as of `now` and return the username claim.
/// A token is valid strictly before its `exp` instant.
pub fn verify_at(
    token: &str,
    dec: &DecodingKey,
    cfg: &JwtCfg,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let mut v = Validation::new(cfg.algorithm);
    // expiry is checked below against `now`, without leeway
    v.validate_exp = false;
    v.leeway = 0;

    let claims = jsonwebtoken::decode::<Claims>(token, dec, &v)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?
        .claims;

    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(claims.sub)
}

pub fn issue_access_jwt(
    username: &str,
    state: &AppState,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_at(username, &state.jwt_enc, &state.jwt_cfg, Utc::now())
}

pub fn decode_validated(token: &str, state: &AppState) -> Result<String, TokenError> {
    verify_at(token, &state.jwt_dec, &state.jwt_cfg, Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone};
    use jsonwebtoken::Algorithm;

    use super::*;

    fn keys(secret: &[u8]) -> (EncodingKey, DecodingKey) {
        (EncodingKey::from_secret(secret), DecodingKey::from_secret(secret))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn roundtrips_username() {
        let (enc, dec) = keys(b"secret");
        let cfg = JwtCfg::default();
        let token = issue_at("alice", &enc, &cfg, t0()).unwrap();
        assert_eq!(verify_at(&token, &dec, &cfg, t0()).unwrap(), "alice");
    }

    #[test]
    fn valid_strictly_before_expiry() {
        let (enc, dec) = keys(b"secret");
        let cfg = JwtCfg {
            access_ttl: ChronoDuration::minutes(30),
            ..JwtCfg::default()
        };
        let token = issue_at("alice", &enc, &cfg, t0()).unwrap();
        let expiry = t0() + ChronoDuration::minutes(30);

        assert!(verify_at(&token, &dec, &cfg, expiry - ChronoDuration::seconds(1)).is_ok());
        assert_eq!(verify_at(&token, &dec, &cfg, expiry), Err(TokenError::Expired));
        assert_eq!(
            verify_at(&token, &dec, &cfg, expiry + ChronoDuration::hours(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let (enc, _) = keys(b"secret");
        let (_, other) = keys(b"another secret");
        let cfg = JwtCfg::default();
        let token = issue_at("alice", &enc, &cfg, t0()).unwrap();
        assert_eq!(
            verify_at(&token, &other, &cfg, t0()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let (_, dec) = keys(b"secret");
        let cfg = JwtCfg::default();
        assert_eq!(verify_at("abc", &dec, &cfg, t0()), Err(TokenError::Malformed));
        assert_eq!(verify_at("", &dec, &cfg, t0()), Err(TokenError::Malformed));
    }

    #[test]
    fn algorithm_mismatch_is_rejected() {
        let (enc, dec) = keys(b"secret");
        let hs512 = JwtCfg {
            algorithm: Algorithm::HS512,
            ..JwtCfg::default()
        };
        let token = issue_at("alice", &enc, &hs512, t0()).unwrap();
        assert!(verify_at(&token, &dec, &JwtCfg::default(), t0()).is_err());
    }
}
