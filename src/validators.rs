/// Request validators
///
/// Field rules for login, administrator and vehicle payloads. Each check
/// returns the first failing rule as a `ValidationError`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::MAX_PASSWORD_BYTES;
use crate::domain::{Role, VehicleData};
use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_VEHICLE_NAME_LENGTH: usize = 150;
const MAX_VEHICLE_BRAND_LENGTH: usize = 100;
const MIN_VEHICLE_YEAR: i32 = 1950;
const MAX_VEHICLE_YEAR: i32 = 2100;

lazy_static! {
    // RFC 5322 simplified email regex
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates an email address exactly as given (no trimming, no case folding)
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(())
}

/// Login only requires a password to be present
pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    Ok(())
}

/// Password rules for creating or changing an administrator
///
/// The upper bound is in bytes, the most bcrypt reads.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort("password".to_string(), MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_BYTES));
    }

    Ok(())
}

/// Role is mandatory on administrator payloads
pub fn require_role(role: Option<Role>) -> Result<Role, ValidationError> {
    role.ok_or_else(|| ValidationError::EmptyField("role".to_string()))
}

pub fn validate_vehicle(name: &str, brand: &str, year: i32) -> Result<VehicleData, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyField("name".to_string()));
    }
    if name.chars().count() > MAX_VEHICLE_NAME_LENGTH {
        return Err(ValidationError::TooLong("name".to_string(), MAX_VEHICLE_NAME_LENGTH));
    }

    let brand = brand.trim();
    if brand.is_empty() {
        return Err(ValidationError::EmptyField("brand".to_string()));
    }
    if brand.chars().count() > MAX_VEHICLE_BRAND_LENGTH {
        return Err(ValidationError::TooLong("brand".to_string(), MAX_VEHICLE_BRAND_LENGTH));
    }

    if !(MIN_VEHICLE_YEAR..=MAX_VEHICLE_YEAR).contains(&year) {
        return Err(ValidationError::OutOfRange(
            "year".to_string(),
            MIN_VEHICLE_YEAR as i64,
            MAX_VEHICLE_YEAR as i64,
        ));
    }

    Ok(VehicleData {
        name: name.to_string(),
        brand: brand.to_string(),
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("administrador@teste.com").is_ok());
        assert!(validate_email("test.email@domain.co.uk").is_ok());
        assert!(validate_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@@example.com").is_err());
        assert!(validate_email(" user@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            validate_email(&too_long),
            Err(ValidationError::TooLong(_, 255))
        ));
        assert!(matches!(validate_email(""), Err(ValidationError::EmptyField(_))));
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_login_password("x").is_ok());
        assert!(validate_login_password("").is_err());

        assert!(validate_new_password("123456").is_ok());
        assert!(matches!(
            validate_new_password("12345"),
            Err(ValidationError::TooShort(_, 6))
        ));
        assert!(validate_new_password(&"a".repeat(72)).is_ok());
        assert!(matches!(
            validate_new_password(&format!("{}A", "x".repeat(72))),
            Err(ValidationError::TooLong(_, 72))
        ));
        assert!(validate_new_password(&"é".repeat(37)).is_err());
    }

    #[test]
    fn test_role_required() {
        assert_eq!(require_role(Some(Role::Editor)).unwrap(), Role::Editor);
        assert!(require_role(None).is_err());
    }

    #[test]
    fn test_vehicle_rules() {
        let vehicle = validate_vehicle(" Civic ", "Honda", 2020).unwrap();
        assert_eq!(vehicle.name, "Civic");

        assert!(validate_vehicle("", "Honda", 2020).is_err());
        assert!(validate_vehicle("Civic", "  ", 2020).is_err());
        assert!(validate_vehicle(&"n".repeat(151), "Honda", 2020).is_err());
        assert!(validate_vehicle("Civic", &"b".repeat(101), 2020).is_err());
        assert!(validate_vehicle("Civic", "Honda", 1949).is_err());
        assert!(validate_vehicle("Civic", "Honda", 2101).is_err());
        assert!(validate_vehicle("Civic", "Honda", 1950).is_ok());
        assert!(validate_vehicle("Civic", "Honda", 2100).is_ok());
    }
}
