use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::CookieConfig;

pub const TOKEN_COOKIE: &str = "token";

pub fn session_cookie(token: String, cfg: &CookieConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(cfg.secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::days(cfg.max_age_days))
        .build()
}

pub fn with_session(jar: CookieJar, token: String, cfg: &CookieConfig) -> CookieJar {
    jar.add(session_cookie(token, cfg))
}

/// Adds an expired `token` cookie so the browser drops the session, whether or
/// not the request carried one.
pub fn without_session(jar: CookieJar) -> CookieJar {
    let mut removal = Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build();
    removal.make_removal();
    jar.add(removal)
}
