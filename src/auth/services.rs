use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{LoginRequest, RegisterRequest};
use crate::error::ApiError;

pub const PASSWORD_MIN_LEN: usize = 5;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const NAME_MAX_LEN: usize = 255;

pub(crate) fn is_valid_login(login: &str) -> bool {
    lazy_static! {
        static ref LOGIN_RE: Regex = Regex::new(r"^\S{1,64}$").unwrap();
    }
    LOGIN_RE.is_match(login)
}

/// Normalizes the request in place and checks its shape.
pub fn validate_register(req: &mut RegisterRequest) -> Result<(), ApiError> {
    req.login = req.login.trim().to_string();
    req.name = req.name.trim().to_string();

    if !is_valid_login(&req.login) {
        return Err(ApiError::bad_request("Invalid login"));
    }
    if req.name.chars().count() > NAME_MAX_LEN {
        return Err(ApiError::bad_request("Name too long"));
    }
    validate_password(&req.password)
}

pub fn validate_login(req: &mut LoginRequest) -> Result<(), ApiError> {
    req.login = req.login.trim().to_string();
    if req.login.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Login and password are required"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(ApiError::bad_request("Password too short"));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(ApiError::bad_request("Password too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, login: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            login: login.into(),
            password: password.into(),
        }
    }

    #[test]
    fn login_shape() {
        assert!(is_valid_login("ada"));
        assert!(is_valid_login("ada.lovelace@example.com"));
        assert!(!is_valid_login(""));
        assert!(!is_valid_login("two words"));
        assert!(!is_valid_login(&"x".repeat(65)));
    }

    #[test]
    fn register_trims_fields() {
        let mut req = register("  Ada  ", "  ada ", "hunter22");
        validate_register(&mut req).unwrap();
        assert_eq!(req.login, "ada");
        assert_eq!(req.name, "Ada");
    }

    #[test]
    fn register_rejects_short_password() {
        let mut req = register("Ada", "ada", "1234");
        let err = validate_register(&mut req).unwrap_err();
        assert_eq!(err.to_string(), "Password too short");
    }

    #[test]
    fn register_accepts_minimum_password() {
        let mut req = register("Ada", "ada", "12345");
        assert!(validate_register(&mut req).is_ok());
    }

    #[test]
    fn register_rejects_blank_login() {
        let mut req = register("Ada", "   ", "hunter22");
        assert!(matches!(
            validate_register(&mut req),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn login_requires_both_fields() {
        let mut req = LoginRequest {
            login: " ".into(),
            password: "x".into(),
        };
        assert!(validate_login(&mut req).is_err());
    }
}
