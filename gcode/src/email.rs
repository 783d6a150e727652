use anyhow::Context;
use gcode_config::EmailConfig;
use gcode_email_impl::{EmailServiceConfig, EmailServiceImpl};

/// Create the smtp client from the mail transport configuration.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(EmailServiceConfig {
        smtp_host: config.smtp_host.clone(),
        smtp_port: config.smtp_port,
        secure: config.secure,
        user: config.user.clone(),
        password: config.password.clone(),
        from: config.from.clone(),
    })
    .context("Failed to create the smtp client")
}
