//! Request-shape checks shared by the HTTP handlers.
//!
//! Every check either passes silently or produces an
//! [`AuthError::Validation`] with a field-specific message, and all
//! checks run before any stateful call.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::user::errors::AuthError;

lazy_static! {
    // CUID shape: leading 'c', at least 8 following characters, no
    // whitespace or hyphens.
    static ref CUID_RE: Regex = Regex::new(r"(?i)^c[^\s-]{8,}$").expect("valid regex");
    static ref TIME_RE: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex");
}

/// Check that every named field is present and non-empty.
///
/// All missing field names are reported in a single error.
pub fn validate_required(fields: &[(&str, &str)]) -> Result<(), AuthError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "Required fields missing: {}",
            missing.join(", ")
        )))
    }
}

/// Which identifier shapes the persistence layer accepts.
///
/// The store's actual key format decides the policy; CUID acceptance is
/// an extension for backends keyed that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    UuidOnly,
    UuidOrCuid,
}

impl IdPolicy {
    pub fn is_valid(&self, id: &str) -> bool {
        let is_uuid = Uuid::parse_str(id).is_ok();
        match self {
            IdPolicy::UuidOnly => is_uuid,
            IdPolicy::UuidOrCuid => is_uuid || CUID_RE.is_match(id),
        }
    }
}

/// Check an identifier against the given policy.
pub fn validate_identifier(id: &str, field: &str, policy: IdPolicy) -> Result<(), AuthError> {
    if id.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    if !policy.is_valid(id) {
        return Err(AuthError::Validation(format!(
            "{} must be a valid ID",
            field
        )));
    }

    Ok(())
}

/// Check that a string is an ISO date (`YYYY-MM-DD` or RFC 3339).
pub fn validate_date(date: &str, field: &str) -> Result<NaiveDate, AuthError> {
    if date.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(date).map(|dt| dt.date_naive()))
        .map_err(|_| AuthError::Validation(format!("{} must be a valid date", field)))
}

/// Check that a string matches `HH:MM` 24-hour format.
pub fn validate_time(time: &str, field: &str) -> Result<(), AuthError> {
    if time.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    if !TIME_RE.is_match(time) {
        return Err(AuthError::Validation(format!(
            "{} must be in HH:MM format",
            field
        )));
    }

    Ok(())
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    const DEFAULT_LIMIT: u32 = 10;
    const MAX_LIMIT: u32 = 100;

    /// Build a pagination window, defaulting to page 1 / limit 10.
    ///
    /// # Errors
    /// * `Validation` - Page below 1 or limit outside 1..=100
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, AuthError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);

        if page < 1 {
            return Err(AuthError::Validation(
                "Page must be a positive integer".to_string(),
            ));
        }

        if limit < 1 || limit > Self::MAX_LIMIT {
            return Err(AuthError::Validation(
                "Limit must be between 1 and 100".to_string(),
            ));
        }

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> usize {
        // Widen before multiplying; page has no upper bound and
        // u32 arithmetic would overflow at large page numbers.
        (self.page as usize - 1) * self.limit as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_lists_all_missing_fields() {
        let result = validate_required(&[("name", ""), ("email", "a@b.co"), ("password", "  ")]);

        match result {
            Err(AuthError::Validation(message)) => {
                assert_eq!(message, "Required fields missing: name, password");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(validate_required(&[("email", "a@b.co"), ("password", "x")]).is_ok());
    }

    #[test]
    fn test_identifier_policies() {
        let uuid = "550e8400-e29b-41d4-a716-446655440000";
        let cuid = "cjld2cjxh0000qzrmn831i7rn";

        assert!(IdPolicy::UuidOnly.is_valid(uuid));
        assert!(!IdPolicy::UuidOnly.is_valid(cuid));

        assert!(IdPolicy::UuidOrCuid.is_valid(uuid));
        assert!(IdPolicy::UuidOrCuid.is_valid(cuid));

        assert!(!IdPolicy::UuidOrCuid.is_valid("not an id"));
        assert!(!IdPolicy::UuidOrCuid.is_valid("c with-space"));

        assert!(validate_identifier(uuid, "id", IdPolicy::UuidOnly).is_ok());
        assert!(validate_identifier("", "id", IdPolicy::UuidOnly).is_err());
        assert!(validate_identifier(cuid, "id", IdPolicy::UuidOnly).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2025-12-24", "date").is_ok());
        assert!(validate_date("2025-12-24T18:30:00Z", "date").is_ok());
        assert!(validate_date("24/12/2025", "date").is_err());
        assert!(validate_date("", "date").is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("09:30", "time").is_ok());
        assert!(validate_time("9:30", "time").is_ok());
        assert!(validate_time("23:59", "time").is_ok());
        assert!(validate_time("24:00", "time").is_err());
        assert!(validate_time("12:60", "time").is_err());
        assert!(validate_time("noon", "time").is_err());
    }

    #[test]
    fn test_pagination_bounds() {
        let default = Pagination::new(None, None).unwrap();
        assert_eq!(default.page, 1);
        assert_eq!(default.limit, 10);
        assert_eq!(default.offset(), 0);

        let window = Pagination::new(Some(3), Some(20)).unwrap();
        assert_eq!(window.offset(), 40);

        assert!(Pagination::new(Some(0), None).is_err());
        assert!(Pagination::new(None, Some(0)).is_err());
        assert!(Pagination::new(None, Some(101)).is_err());
        assert!(Pagination::new(None, Some(100)).is_ok());
    }

    #[test]
    fn test_pagination_offset_does_not_overflow_at_max_page() {
        let window = Pagination::new(Some(u32::MAX), Some(100)).unwrap();
        assert_eq!(window.offset(), (u32::MAX as usize - 1) * 100);
    }
}
