use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenCodec;
use auth::TokenKind;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::errors::MailerError;
use crate::account::models::User;
use crate::account::ports::MailTemplate;
use crate::account::ports::Mailer;
use crate::config::Config;

struct MailContent {
    subject: &'static str,
    text: String,
    html: String,
}

/// SMTP notification sink.
///
/// Builds confirm/reset messages whose links embed a freshly issued link
/// token, and hands them to the configured relay. Callers treat dispatch as
/// fire-and-forget; failures come back only so they can be logged.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
    tokens: Arc<TokenCodec>,
}

impl SmtpMailer {
    /// Create a mailer for the configured SMTP endpoint.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `tokens` - Codec issuing the confirm/forgot link tokens
    pub fn new(config: &Config, tokens: Arc<TokenCodec>) -> Result<Self, anyhow::Error> {
        tracing::info!(
            smtp_host = %config.mail.smtp_host,
            smtp_port = config.mail.smtp_port,
            "Initializing SMTP mailer"
        );

        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.mail.smtp_host)
                .port(config.mail.smtp_port)
                .build();

        let from = config.mail.from_address.parse::<Mailbox>()?;

        Ok(Self {
            transport,
            from,
            frontend_url: config.frontend.base_url.clone(),
            tokens,
        })
    }

    fn content_for(&self, user: &User, template: MailTemplate) -> Result<MailContent, MailerError> {
        match template {
            MailTemplate::ConfirmEmail => {
                let token = self
                    .tokens
                    .issue(TokenKind::Confirm, &user.email)
                    .map_err(|e| MailerError::TokenFailed(e.to_string()))?;
                let link = format!("{}/account/confirm/{}", self.frontend_url, token);
                Ok(MailContent {
                    subject: "Verification email",
                    text: format!("Click here to confirm your email: {link}"),
                    html: format!(r#"<b>Click <a href="{link}">here</a> to confirm your email</b>"#),
                })
            }
            MailTemplate::ForgotPassword => {
                let token = self
                    .tokens
                    .issue(TokenKind::Forgot, &user.email)
                    .map_err(|e| MailerError::TokenFailed(e.to_string()))?;
                let link = format!("{}/account/reset/{}", self.frontend_url, token);
                Ok(MailContent {
                    subject: "Reset password email",
                    text: format!("Click here to reset your password: {link}"),
                    html: format!(
                        r#"<b>Click <a href="{link}">here</a> to reset your password</b>"#
                    ),
                })
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, user: &User, template: MailTemplate) -> Result<(), MailerError> {
        let content = self.content_for(user, template)?;

        let to = user
            .email
            .parse::<Mailbox>()
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(
                content.text,
                content.html,
            ))
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        tracing::info!("Sending {:?} mail to {}", template, user.email);

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailerError::SendFailed(e.to_string()))
    }
}
