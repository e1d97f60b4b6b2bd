//! # Client Validation
//!
//! This module checks candidate [`Client`] records before they are admitted to a
//! repository. Validation is a pure function: it performs no I/O and reports every
//! violation it finds rather than stopping at the first one, so callers can hand a
//! complete error set back to whoever submitted the record.
//!
//! ## Rules
//!
//! - `id`, `firstName`, `lastName`, `email`, and `phoneNumber` must not be blank
//!   (empty or whitespace only).
//! - `email` must additionally look like `local@domain.tld`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use rolodex::{Client, validate_client};
//!
//! let client = Client::new("A", "Junvic", "Valdez", "contact@junvic.me", "+123456789");
//! assert!(validate_client(&client).is_ok());
//!
//! let errors = validate_client(&Client::default()).unwrap_err();
//! assert_eq!(errors.len(), 5);
//! assert!(errors.contains("firstName"));
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Client;

// One '@', a non-empty local part, and a domain with at least one dot between
// non-empty labels.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is a valid regex")
});

/// Field-level validation failures, keyed by the field's wire name.
///
/// Serializes as a plain JSON object mapping each failing field to the list of
/// messages describing what is wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns true when no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `field` has at least one violation.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the messages recorded for `field`, or an empty slice.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates over the failing fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Consumes the error set, returning the underlying field map.
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

/// Validates a candidate client, returning every violation found.
pub fn validate_client(client: &Client) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    require_present(&mut errors, "id", "Id", &client.id);
    require_present(&mut errors, "firstName", "First Name", &client.first_name);
    require_present(&mut errors, "lastName", "Last Name", &client.last_name);
    if require_present(&mut errors, "email", "Email", &client.email)
        && !is_valid_email(&client.email)
    {
        errors.add("email", "'Email' is not a valid email address.");
    }
    require_present(
        &mut errors,
        "phoneNumber",
        "Phone Number",
        &client.phone_number,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns true if `email` has the shape `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Records a violation when `value` is blank; returns whether it was present.
fn require_present(
    errors: &mut ValidationErrors,
    field: &str,
    display_name: &str,
    value: &str,
) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("'{}' must not be empty.", display_name));
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::junvic;

    #[test]
    fn valid_client_passes() {
        assert_eq!(validate_client(&junvic()), Ok(()));
    }

    #[test]
    fn empty_client_reports_every_field() {
        let errors = validate_client(&Client::default()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["email", "firstName", "id", "lastName", "phoneNumber"]
        );
        assert_eq!(errors.messages("id"), ["'Id' must not be empty."]);
        assert_eq!(
            errors.messages("phoneNumber"),
            ["'Phone Number' must not be empty."]
        );
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut client = junvic();
        client.first_name = "   ".to_string();
        client.phone_number = "\t".to_string();

        let errors = validate_client(&client).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("firstName"));
        assert!(errors.contains("phoneNumber"));
    }

    #[test]
    fn blank_email_only_reports_missing() {
        let mut client = junvic();
        client.email = String::new();

        let errors = validate_client(&client).unwrap_err();
        assert_eq!(errors.messages("email"), ["'Email' must not be empty."]);
    }

    #[test]
    fn malformed_email_reports_format() {
        for email in [
            "contact",
            "contact@",
            "@junvic.me",
            "contact@junvic",
            "contact@junvic.",
            "contact@.me",
            "con tact@junvic.me",
            "a@b@junvic.me",
        ] {
            let mut client = junvic();
            client.email = email.to_string();

            let errors = validate_client(&client).unwrap_err();
            assert_eq!(
                errors.messages("email"),
                ["'Email' is not a valid email address."],
                "expected {email:?} to be rejected"
            );
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn accepts_common_email_shapes() {
        for email in [
            "contact@junvic.me",
            "johnsmith@gmail.com",
            "first.last+tag@mail.example.co.uk",
        ] {
            assert!(is_valid_email(email), "expected {email:?} to be accepted");
        }
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "'Email' must not be empty.");
        errors.add("email", "'Email' is not a valid email address.");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": ["'Email' must not be empty.", "'Email' is not a valid email address."]
            })
        );
    }
}
