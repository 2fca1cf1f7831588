use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie::{with_session, without_session},
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
        services::{validate_login, validate_register},
    },
    error::ApiError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/me", get(get_me))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(mut payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    if let Err(e) = validate_register(&mut payload) {
        warn!(login = %payload.login, error = %e, "invalid registration");
        return Err(e);
    }

    if User::find_by_login(&state.db, &payload.login).await?.is_some() {
        warn!(login = %payload.login, "login already registered");
        return Err(ApiError::bad_request("User already exists"));
    }

    let hash = hash_password(&payload.password)?;

    // A concurrent registration can still win the race; the unique index catches it.
    let Some(user) = User::create(&state.db, &payload.name, &payload.login, &hash).await? else {
        warn!(login = %payload.login, "login already registered");
        return Err(ApiError::bad_request("User already exists"));
    };

    let token = JwtKeys::from_ref(&state).sign(&user)?;
    let jar = with_session(jar, token, &state.config.cookie);

    info!(user_id = %user.id, login = %user.login, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(mut payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    validate_login(&mut payload)?;

    let user = match User::find_by_login(&state.db, &payload.login).await? {
        Some(u) => u,
        None => {
            warn!(login = %payload.login, "login unknown user");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(login = %payload.login, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(&user)?;
    let jar = with_session(jar, token, &state.config.cookie);

    info!(user_id = %user.id, login = %user.login, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            message: "Logged in",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        without_session(jar),
        Json(MessageResponse {
            message: "Logged out",
        }),
    )
}

#[instrument(skip(user))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}
