use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::{claims::Claims, cookie::TOKEN_COOKIE, jwt::JwtKeys, repo_types::User};
use crate::{error::ApiError, state::AppState};

/// Validates the session cookie and yields its claims.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned()) else {
            debug!("missing token cookie");
            return Err(ApiError::Unauthorized);
        };

        let keys = JwtKeys::from_ref(state);
        match keys.verify(&token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Like [`AuthUser`], but also loads the user row named by the token.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        match User::find_by_login(&state.db, &claims.login).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(login = %claims.login, "token refers to unknown user");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
