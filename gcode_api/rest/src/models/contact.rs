use std::collections::BTreeMap;

use gcode_core_contact_contracts::{AcceptedSubmission, RejectedSubmission};
use gcode_models::contact::ContactRequest;
use serde::{Deserialize, Serialize};

/// Form fields exactly as posted by the contact form. Missing fields are
/// treated as empty so they show up as validation errors instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub query: String,
}

impl From<ApiContactRequest> for ContactRequest {
    fn from(value: ApiContactRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            query: value.query,
        }
    }
}

impl From<ContactRequest> for ApiContactRequest {
    fn from(value: ContactRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            query: value.query,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiAcceptedSubmission {
    pub name: String,
    pub email: String,
    pub query: String,
}

impl From<AcceptedSubmission> for ApiAcceptedSubmission {
    fn from(value: AcceptedSubmission) -> Self {
        Self {
            name: value.submission.name.into_inner(),
            email: value.submission.email.to_string(),
            query: value.submission.query.into_inner(),
        }
    }
}

/// Mirrors what the form needs to redisplay itself: a message per invalid
/// field plus the previously entered values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRejectedSubmission {
    pub errors: BTreeMap<&'static str, String>,
    pub default_values: ApiContactRequest,
}

impl From<RejectedSubmission> for ApiRejectedSubmission {
    fn from(value: RejectedSubmission) -> Self {
        Self {
            errors: value
                .errors
                .iter()
                .map(|(field, error)| (field.as_str(), error.to_string()))
                .collect(),
            default_values: value.default_values.into(),
        }
    }
}
