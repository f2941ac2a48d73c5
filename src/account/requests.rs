//! Account request types
//!
//! Structured parameter sets for the account operations. Absent fields
//! deserialize as empty strings so they fail validation, not parsing.

use serde::Deserialize;
use std::fmt;

/// Parameters for creating an account
#[derive(Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(name: &str, phone: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parameters for a login attempt
#[derive(Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(phone: &str, password: &str) -> Self {
        Self {
            phone: phone.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(req.name, "A");
        assert!(req.phone.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_debug_never_shows_password() {
        let register = RegisterRequest::new("A", "555", "hunter2");
        let login = LoginRequest::new("555", "hunter2");
        assert!(!format!("{:?}", register).contains("hunter2"));
        assert!(!format!("{:?}", login).contains("hunter2"));
    }
}
