use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::debug;

use super::token::decode_validated;
use crate::error::AppError;
use crate::models::user::{self, Column as UserCol, Entity as User};
use crate::AppState;

/// The authenticated user, injected into request extensions by [`require_user`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub user::Model);

/// `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Gate for protected routes: bearer token -> verified username -> user row.
/// Every failure is the same 401.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let username = {
        let token = bearer_token(req.headers()).ok_or_else(AppError::unauthenticated)?;
        decode_validated(token, &state).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            AppError::unauthenticated()
        })?
    };

    let Some(found) = User::find()
        .filter(UserCol::Username.eq(&username))
        .one(&state.db)
        .await?
    else {
        debug!(%username, "token subject no longer exists");
        return Err(AppError::unauthenticated());
    };

    req.extensions_mut().insert(CurrentUser(found));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn with_auth(v: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        h
    }

    #[test]
    fn extracts_bearer() {
        assert_eq!(bearer_token(&with_auth("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&with_auth("bearer abc")), Some("abc"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&with_auth("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&with_auth("Bearer")), None);
        assert_eq!(bearer_token(&with_auth("Bearer   ")), None);
    }
}
