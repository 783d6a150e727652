use std::future::Future;

use gcode_models::{
    contact::{ContactRequest, ContactSubmission, ValidationErrorSet},
    notice::Notice,
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission and forward it to the business
    /// inbox.
    fn submit(
        &self,
        request: ContactRequest,
    ) -> impl Future<Output = Result<AcceptedSubmission, ContactSubmitError>> + Send;
}

/// Outcome of a submission that passed validation. Whether the notification
/// email actually went out is a configuration question, see
/// [`ContactSubmitError::Delivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSubmission {
    pub submission: ContactSubmission,
    pub notice: Notice,
}

/// Validation outcome of a rejected submission, carrying the received values
/// so the form can be redisplayed with the visitor's input intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSubmission {
    pub errors: ValidationErrorSet,
    pub default_values: ContactRequest,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The submission failed validation.")]
    Rejected(RejectedSubmission),
    #[error("Failed to deliver the notification email.")]
    Delivery,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        request: ContactRequest,
        result: Result<AcceptedSubmission, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(request))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
