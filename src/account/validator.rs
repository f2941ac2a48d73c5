//! Registration input validation
//!
//! Runs before the store is touched. Values are checked as given and stored
//! untrimmed; no normalization is applied to the phone.

use crate::account::requests::RegisterRequest;
use crate::error::AccountError;

/// Checks a single required field: non-blank and within `max_length` bytes.
fn check_field(field: &'static str, value: &str, max_length: usize) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::MissingField(field));
    }

    if value.len() > max_length {
        return Err(AccountError::FieldTooLong(field));
    }

    Ok(())
}

/// Validates every field of a registration request, in declaration order.
pub fn validate_registration(
    request: &RegisterRequest,
    max_length: usize,
) -> Result<(), AccountError> {
    check_field("name", &request.name, max_length)?;
    check_field("phone", &request.phone, max_length)?;
    check_field("password", &request.password, max_length)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_request_passes() {
        let req = RegisterRequest::new("A", "555", "p1");
        assert!(validate_registration(&req, 64).is_ok());
    }

    #[test]
    fn test_empty_and_blank_fields_rejected() {
        let cases = [
            (RegisterRequest::new("", "555", "p1"), "name"),
            (RegisterRequest::new("A", "", "p1"), "phone"),
            (RegisterRequest::new("A", "555", ""), "password"),
            (RegisterRequest::new("   ", "555", "p1"), "name"),
            (RegisterRequest::new("A", "\t", "p1"), "phone"),
        ];

        for (req, expected) in cases {
            match validate_registration(&req, 64) {
                Err(AccountError::MissingField(field)) => assert_eq!(field, expected),
                other => panic!("expected MissingField({}), got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_overlong_field_rejected() {
        let req = RegisterRequest::new("A", "555", &"x".repeat(65));
        assert!(matches!(
            validate_registration(&req, 64),
            Err(AccountError::FieldTooLong("password"))
        ));
    }
}
