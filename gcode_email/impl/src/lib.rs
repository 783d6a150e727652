use anyhow::anyhow;
use email_address::EmailAddress;
use gcode_email_contracts::{ContentType, Email, EmailService};
use lettre::{
    message::header, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

/// Sends emails through a single long lived smtp connection pool.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

/// Transport settings for [`EmailServiceImpl::new`].
///
/// Credentials are optional: their absence is not checked here and only
/// shows up when the relay rejects a send.
#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Use an implicit tls connection (smtps). Disabling this sends
    /// everything in the clear and is only suitable for local testing.
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: EmailAddress,
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let builder = builder.port(config.smtp_port);
        let builder = match (config.user, config.password) {
            (Some(user), Some(password)) => builder.credentials(Credentials::new(user, password)),
            _ => builder,
        };

        Ok(Self {
            from: config.from,
            transport: builder.build(),
        })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.to_string().parse()?)
            .to(email.recipient.to_string().parse()?);

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.to_string().parse()?);
        }

        builder
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EmailServiceImpl {
        EmailServiceImpl::new(EmailServiceConfig {
            smtp_host: "localhost".into(),
            smtp_port: 2525,
            secure: false,
            user: None,
            password: None,
            from: "noreply@example.com".parse().unwrap(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn builds_plain_text_message() {
        let message = service()
            .build_message(Email {
                recipient: "contact@example.com".parse().unwrap(),
                subject: "Hello".into(),
                body: "Hello World!".into(),
                content_type: ContentType::Text,
                reply_to: None,
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: noreply@example.com"));
        assert!(raw.contains("To: contact@example.com"));
        assert!(raw.contains("Subject: Hello"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("Hello World!"));
        assert!(!raw.contains("Reply-To:"));
    }

    #[tokio::test]
    async fn sets_reply_to_and_html_content_type() {
        let message = service()
            .build_message(Email {
                recipient: "contact@example.com".parse().unwrap(),
                subject: "Hello".into(),
                body: "<p>Hello World!</p>".into(),
                content_type: ContentType::Html,
                reply_to: Some("ana@example.com".parse().unwrap()),
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: ana@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn accepts_missing_credentials() {
        // Building the transport must not fail without credentials; the
        // relay rejects unauthenticated sends at delivery time instead.
        EmailServiceImpl::new(EmailServiceConfig {
            smtp_host: "smtp.zoho.eu".into(),
            smtp_port: 465,
            secure: true,
            user: None,
            password: None,
            from: "noreply@example.com".parse().unwrap(),
        })
        .unwrap();
    }
}
