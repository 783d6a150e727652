use std::collections::BTreeMap;

use email_address::EmailAddress;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw contact form input, exactly as received from the client.
///
/// Nothing about it has been checked yet. It only exists to be passed to
/// [`ContactRequest::validate`] and to be echoed back verbatim when
/// validation fails, so the form can be redisplayed with the visitor's
/// input intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub query: String,
}

/// A contact form submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionName,
    pub email: EmailAddress,
    pub query: SubmissionQuery,
}

#[nutype(
    validate(not_empty, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionName(String);

#[nutype(
    validate(not_empty, len_char_max = 4096),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionQuery(String);

impl ContactRequest {
    /// Checks all three fields and reports every invalid one at once, so the
    /// form can highlight all of them in a single round trip.
    pub fn validate(&self) -> Result<ContactSubmission, ValidationErrorSet> {
        let mut errors = ValidationErrorSet::default();

        let name = SubmissionName::try_from(self.name.clone())
            .map_err(|err| errors.insert(SubmissionField::Name, err.into()))
            .ok();
        let email = parse_email(&self.email)
            .map_err(|err| errors.insert(SubmissionField::Email, err))
            .ok();
        let query = SubmissionQuery::try_from(self.query.clone())
            .map_err(|err| errors.insert(SubmissionField::Query, err.into()))
            .ok();

        match (name, email, query) {
            (Some(name), Some(email), Some(query)) => Ok(ContactSubmission { name, email, query }),
            _ => Err(errors),
        }
    }
}

fn parse_email(raw: &str) -> Result<EmailAddress, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::EmptyField);
    }
    raw.parse().map_err(|_| FieldError::InvalidFormat)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionField {
    Name,
    Email,
    Query,
}

impl SubmissionField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Query => "query",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("This field is required.")]
    EmptyField,
    #[error("This field is not valid.")]
    InvalidFormat,
}

impl From<SubmissionNameError> for FieldError {
    fn from(err: SubmissionNameError) -> Self {
        match err {
            SubmissionNameError::NotEmptyViolated => Self::EmptyField,
            SubmissionNameError::LenCharMaxViolated => Self::InvalidFormat,
        }
    }
}

impl From<SubmissionQueryError> for FieldError {
    fn from(err: SubmissionQueryError) -> Self {
        match err {
            SubmissionQueryError::NotEmptyViolated => Self::EmptyField,
            SubmissionQueryError::LenCharMaxViolated => Self::InvalidFormat,
        }
    }
}

/// Field level validation errors, only containing entries for the fields
/// that actually failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorSet(BTreeMap<SubmissionField, FieldError>);

impl ValidationErrorSet {
    pub fn insert(&mut self, field: SubmissionField, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: SubmissionField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubmissionField, FieldError)> + '_ {
        self.0.iter().map(|(&field, &error)| (field, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, query: &str) -> ContactRequest {
        ContactRequest {
            name: name.into(),
            email: email.into(),
            query: query.into(),
        }
    }

    #[test]
    fn accepts_valid_input() {
        let submission = request("Ana", "ana@example.com", "Need a quote")
            .validate()
            .unwrap();

        assert_eq!(&*submission.name, "Ana");
        assert_eq!(submission.email.to_string(), "ana@example.com");
        assert_eq!(&*submission.query, "Need a quote");
    }

    #[test]
    fn reports_every_empty_field() {
        let errors = request("", "", "").validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        for field in [
            SubmissionField::Name,
            SubmissionField::Email,
            SubmissionField::Query,
        ] {
            assert_eq!(errors.get(field), Some(FieldError::EmptyField));
        }
    }

    #[test]
    fn rejects_malformed_email_regardless_of_other_fields() {
        let errors = request("Ana", "not-an-address", "Need a quote")
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(SubmissionField::Email),
            Some(FieldError::InvalidFormat)
        );
    }

    #[test]
    fn does_not_stop_at_the_first_invalid_field() {
        let errors = request("", "bad", "hi").validate().unwrap_err();

        assert_eq!(errors.get(SubmissionField::Name), Some(FieldError::EmptyField));
        assert_eq!(
            errors.get(SubmissionField::Email),
            Some(FieldError::InvalidFormat)
        );
        assert_eq!(errors.get(SubmissionField::Query), None);
    }

    #[test]
    fn rejects_overlong_name() {
        let errors = request(&"x".repeat(257), "ana@example.com", "hi")
            .validate()
            .unwrap_err();

        assert_eq!(
            errors.get(SubmissionField::Name),
            Some(FieldError::InvalidFormat)
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let valid = request("Ana", "ana@example.com", "Need a quote");
        assert_eq!(valid.validate(), valid.validate());

        let invalid = request("", "bad", "");
        assert_eq!(invalid.validate(), invalid.validate());
    }

    #[test]
    fn serializes_errors_with_field_keys() {
        let errors = request("", "bad", "hi").validate().unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"name": "empty_field", "email": "invalid_format"})
        );
    }
}
