use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub secure: bool,
    pub max_age_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "mealtrack".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "mealtrack-users".into()),
            ttl_minutes: parse_or(lookup("JWT_TTL_MINUTES"), "JWT_TTL_MINUTES", 60)?,
        };
        let cookie = CookieConfig {
            secure: parse_or(lookup("COOKIE_SECURE"), "COOKIE_SECURE", true)?,
            max_age_days: parse_or(lookup("COOKIE_MAX_AGE_DAYS"), "COOKIE_MAX_AGE_DAYS", 7)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(lookup("APP_PORT"), "APP_PORT", 8080)?,
            jwt,
            cookie,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults_when_only_required_keys_are_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/mealtrack"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(cfg.database_url, "postgres://localhost/mealtrack");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.jwt.issuer, "mealtrack");
        assert_eq!(cfg.jwt.audience, "mealtrack-users");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert!(cfg.cookie.secure);
        assert_eq!(cfg.cookie.max_age_days, 7);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/x"),
            ("JWT_SECRET", "k"),
            ("JWT_TTL_MINUTES", "15"),
            ("COOKIE_SECURE", "false"),
            ("APP_PORT", "3000"),
            ("APP_HOST", "127.0.0.1"),
        ]))
        .unwrap();

        assert_eq!(cfg.jwt.ttl_minutes, 15);
        assert!(!cfg.cookie.secure);
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/x")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn invalid_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/x"),
            ("JWT_SECRET", "k"),
            ("APP_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
