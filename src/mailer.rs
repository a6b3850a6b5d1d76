//! Outbound mail: composing the multipart message and handing it to a relay.
//!
//! One attempt per submission. There is no retry and no queue; a failure is
//! reported back to the form and the user resubmits by hand.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::MailError;
use crate::image::{BackgroundImage, ATTACHMENT_FILE_NAME};

pub const SMTP_SERVER: &str = "smtp.2925.com";
pub const SMTP_PORT: u16 = 25;

/// A serialized submission ready to go out.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub image: Option<BackgroundImage>,
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Compose a multipart/mixed message: the text body, then the picture as an
/// attachment under a fixed file name.
pub fn build_message(from: &str, to: &str, mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    if let Some(image) = &mail.image {
        let content_type = ContentType::parse(image.content_type())?;
        parts = parts.singlepart(
            Attachment::new(ATTACHMENT_FILE_NAME.to_string())
                .body(image.bytes.clone(), content_type),
        );
    }

    let message = Message::builder()
        .from(mailbox(from)?)
        .to(mailbox(to)?)
        .subject(mail.subject.clone())
        .multipart(parts)?;
    Ok(message)
}

/// Sends through any lettre transport so tests can swap in a stub.
pub struct Mailer<T> {
    transport: T,
    from: String,
    to: String,
}

impl Mailer<SmtpTransport> {
    /// The production relay, or `None` when credentials are not configured.
    pub fn smtp(config: &MailConfig) -> Option<Self> {
        let (user, password) = config.credentials()?;
        let transport = SmtpTransport::builder_dangerous(SMTP_SERVER)
            .port(SMTP_PORT)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();
        Some(Self::new(transport, user, &config.recipient))
    }
}

impl<T> Mailer<T>
where
    T: Transport,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(transport: T, from: &str, to: &str) -> Self {
        Self {
            transport,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Build and transmit one message. Blocks until the relay answers.
    pub fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&self.from, &self.to, mail)?;
        self.transport
            .send(&message)
            .map_err(|err| MailError::Transport(Box::new(err)))?;
        Ok(())
    }
}

/// What happened to a submission after it was serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No credentials: nothing was sent, show the would-be email instead.
    Preview { body: String, has_attachment: bool },
    Failed(String),
}

/// Send `mail` through the configured relay, or fall back to a preview.
pub fn deliver(config: &MailConfig, mail: &OutgoingMail) -> Delivery {
    match Mailer::smtp(config) {
        Some(mailer) => dispatch(&mailer, mail),
        None => {
            warn!("mail credentials not configured; showing preview instead of sending");
            Delivery::Preview {
                body: mail.body.clone(),
                has_attachment: mail.image.is_some(),
            }
        }
    }
}

fn dispatch<T>(mailer: &Mailer<T>, mail: &OutgoingMail) -> Delivery
where
    T: Transport,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    match mailer.send(mail) {
        Ok(()) => {
            info!(
                subject = %mail.subject,
                attachment = mail.image.is_some(),
                "email sent"
            );
            Delivery::Sent
        }
        Err(err) => {
            warn!(subject = %mail.subject, error = %err, "email delivery failed");
            Delivery::Failed(err.to_string())
        }
    }
}
