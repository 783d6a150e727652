use std::sync::Arc;

use email_address::EmailAddress;
use gcode_core_contact_contracts::{
    AcceptedSubmission, ContactFeatureService, ContactSubmitError, RejectedSubmission,
};
use gcode_email_contracts::{ContentType, Email, EmailService};
use gcode_models::{
    contact::ContactRequest,
    notice::{Notice, NoticeLevel},
};
use gcode_templates_contracts::{ContactNotificationTemplate, TemplateService};
use tracing::error;

const SUBJECT: &str = "New Contact Form Submission";

/// Message shown to the visitor once a submission passed validation.
const SUCCESS_MESSAGE: &str =
    "Thank you for your message! We will get back to you as soon as possible.";

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Inbox that receives the notification emails.
    pub email: Arc<EmailAddress>,
    /// Whether a failed delivery is reported to the submitter instead of
    /// only being logged.
    pub report_delivery_failures: bool,
}

impl<EmailS, TemplateS> ContactFeatureServiceImpl<EmailS, TemplateS> {
    pub fn new(email: EmailS, template: TemplateS, config: ContactFeatureConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, TemplateS> ContactFeatureService for ContactFeatureServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn submit(
        &self,
        request: ContactRequest,
    ) -> Result<AcceptedSubmission, ContactSubmitError> {
        let submission = match request.validate() {
            Ok(submission) => submission,
            Err(errors) => {
                return Err(ContactSubmitError::Rejected(RejectedSubmission {
                    errors,
                    default_values: request,
                }))
            }
        };

        let body = self.template.render(&ContactNotificationTemplate {
            name: submission.name.clone().into_inner(),
            email: submission.email.to_string(),
            query: submission.query.clone().into_inner(),
        })?;

        let email = Email {
            recipient: (*self.config.email).clone(),
            subject: SUBJECT.into(),
            body,
            content_type: ContentType::Html,
            reply_to: Some(submission.email.clone()),
        };

        match self.email.send(email).await {
            Ok(true) => {}
            Ok(false) if self.config.report_delivery_failures => {
                return Err(ContactSubmitError::Delivery)
            }
            Err(err) if self.config.report_delivery_failures => return Err(err.into()),
            Ok(false) => error!("The mail transport did not accept the contact notification"),
            Err(err) => error!("Failed to send the contact notification: {err:#}"),
        }

        Ok(AcceptedSubmission {
            submission,
            notice: Notice {
                message: SUCCESS_MESSAGE.into(),
                level: NoticeLevel::Success,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use gcode_email_contracts::MockEmailService;
    use gcode_models::contact::{FieldError, SubmissionField};
    use gcode_templates_contracts::MockTemplateService;
    use pretty_assertions::assert_eq;

    use super::*;

    const BODY: &str = "<div>rendered notification</div>";

    fn config(report_delivery_failures: bool) -> ContactFeatureConfig {
        ContactFeatureConfig {
            email: Arc::new("info@g-code.com.hr".parse().unwrap()),
            report_delivery_failures,
        }
    }

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            query: "Need a quote".into(),
        }
    }

    fn template() -> MockTemplateService {
        MockTemplateService::new().with_render(
            ContactNotificationTemplate {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                query: "Need a quote".into(),
            },
            BODY.into(),
        )
    }

    fn expected_email(config: &ContactFeatureConfig) -> Email {
        Email {
            recipient: (*config.email).clone(),
            subject: SUBJECT.into(),
            body: BODY.into(),
            content_type: ContentType::Html,
            reply_to: Some("ana@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn accepts_and_delivers() {
        // Arrange
        let config = config(false);
        let email = MockEmailService::new().with_send(expected_email(&config), true);
        let sut = ContactFeatureServiceImpl::new(email, template(), config);

        // Act
        let accepted = sut.submit(request()).await.unwrap();

        // Assert
        assert_eq!(&*accepted.submission.name, "Ana");
        assert_eq!(accepted.submission.email.to_string(), "ana@example.com");
        assert_eq!(&*accepted.submission.query, "Need a quote");
        assert_eq!(accepted.notice.level, NoticeLevel::Success);
        assert_eq!(accepted.notice.message, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn rejects_invalid_input_without_sending() {
        // Arrange
        let sut = ContactFeatureServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            config(false),
        );
        let request = ContactRequest {
            name: "".into(),
            email: "bad".into(),
            query: "hi".into(),
        };

        // Act
        let result = sut.submit(request.clone()).await;

        // Assert
        let Err(ContactSubmitError::Rejected(rejected)) = result else {
            panic!("expected the submission to be rejected");
        };
        assert_eq!(
            rejected.errors.get(SubmissionField::Name),
            Some(FieldError::EmptyField)
        );
        assert_eq!(
            rejected.errors.get(SubmissionField::Email),
            Some(FieldError::InvalidFormat)
        );
        assert_eq!(rejected.errors.get(SubmissionField::Query), None);
        assert_eq!(rejected.default_values, request);
    }

    #[tokio::test]
    async fn swallows_rejected_delivery_by_default() {
        // Arrange
        let config = config(false);
        let email = MockEmailService::new().with_send(expected_email(&config), false);
        let sut = ContactFeatureServiceImpl::new(email, template(), config);

        // Act
        let accepted = sut.submit(request()).await.unwrap();

        // Assert
        assert_eq!(accepted.notice.level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn swallows_transport_errors_by_default() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_send()
            .once()
            .return_once(|_| Box::pin(std::future::ready(Err(anyhow::anyhow!("connection refused")))));
        let sut = ContactFeatureServiceImpl::new(email, template(), config(false));

        // Act
        let accepted = sut.submit(request()).await.unwrap();

        // Assert
        assert_eq!(accepted.notice.level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn reports_rejected_delivery_when_configured() {
        // Arrange
        let config = config(true);
        let email = MockEmailService::new().with_send(expected_email(&config), false);
        let sut = ContactFeatureServiceImpl::new(email, template(), config);

        // Act
        let result = sut.submit(request()).await;

        // Assert
        assert!(matches!(result, Err(ContactSubmitError::Delivery)));
    }

    #[tokio::test]
    async fn reports_transport_errors_when_configured() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_send()
            .once()
            .return_once(|_| Box::pin(std::future::ready(Err(anyhow::anyhow!("connection refused")))));
        let sut = ContactFeatureServiceImpl::new(email, template(), config(true));

        // Act
        let result = sut.submit(request()).await;

        // Assert
        assert!(matches!(result, Err(ContactSubmitError::Other(_))));
    }
}
