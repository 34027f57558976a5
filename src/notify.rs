//! Delivery of the rendered report over SMTP.

use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{self, authentication::Credentials},
};

use crate::{
    config::MailConfig,
    error::{DigestError, Result},
};

/// An authenticated SMTP session.
///
/// The underlying connection pool is torn down when the value is dropped,
/// on every exit path from the send step.
pub struct Mailer {
    transport: SmtpTransport,
}

impl Mailer {
    /// Establish and verify an authenticated STARTTLS session to the relay.
    pub fn open(mail: &MailConfig, password: &str) -> Result<Mailer> {
        let credentials = Credentials::new(mail.username.clone(), password.to_string());
        let transport = SmtpTransport::starttls_relay(&mail.smtp_host)
            .map_err(|e| DigestError::Connection(e.to_string()))?
            .port(mail.smtp_port)
            .credentials(credentials)
            .build();
        match transport.test_connection() {
            Ok(true) => Ok(Mailer { transport }),
            Ok(false) => Err(DigestError::Connection(format!(
                "{} did not accept the connection",
                mail.smtp_host
            ))),
            Err(e) => Err(classify(e, Stage::Open)),
        }
    }

    /// Send the rendered report as a single HTML body part.
    pub fn send(&self, mail: &MailConfig, html: String) -> Result<()> {
        let message = build_message(mail, html)?;
        self.transport
            .send(&message)
            .map_err(|e| classify(e, Stage::Send))?;
        Ok(())
    }
}

enum Stage {
    Open,
    Send,
}

/// Build the outgoing message: multipart, one HTML part.
fn build_message(mail: &MailConfig, html: String) -> Result<Message> {
    let from: Mailbox = mail.from.parse().map_err(|e| {
        DigestError::config(format!("invalid mail.from address {:?}: {e}", mail.from))
    })?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| DigestError::config(format!("invalid mail.to address {:?}: {e}", mail.to)))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .multipart(MultiPart::mixed().singlepart(SinglePart::html(html)))
        .map_err(|e| DigestError::Delivery(e.to_string()))
}

/// Sort an SMTP error into the digest taxonomy.
///
/// Transient and permanent errors carry an SMTP response code, so they came
/// from the relay itself; everything else is transport trouble.
fn classify(e: smtp::Error, stage: Stage) -> DigestError {
    if e.is_timeout() || e.is_tls() {
        return DigestError::Connection(e.to_string());
    }
    let from_relay = e.is_transient() || e.is_permanent();
    match stage {
        // A rejection while the session is being set up means the relay
        // refused the credentials.
        Stage::Open if from_relay => DigestError::Auth(e.to_string()),
        Stage::Send if from_relay => DigestError::Delivery(e.to_string()),
        _ => DigestError::Connection(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: "digest@example.com".to_string(),
            password: Some("hunter2".to_string()),
            from: "digest@example.com".to_string(),
            to: "reader@example.com".to_string(),
            subject: "Arxiv Daily Digest".to_string(),
        }
    }

    #[test]
    fn message_carries_subject_and_addresses() {
        let message = build_message(&mail_config(), "<html></html>".to_string()).expect("build");
        let formatted = String::from_utf8(message.formatted()).expect("utf8");
        assert!(formatted.contains("Subject: Arxiv Daily Digest"));
        assert!(formatted.contains("From: digest@example.com"));
        assert!(formatted.contains("To: reader@example.com"));
        assert!(formatted.contains("multipart/mixed"));
    }

    #[test]
    fn html_body_is_carried_as_a_single_html_part() {
        let message =
            build_message(&mail_config(), "<h1>No new papers found.</h1>".to_string())
                .expect("build");
        let formatted = String::from_utf8(message.formatted()).expect("utf8");
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("No new papers found."));
    }

    #[test]
    fn invalid_sender_is_a_config_error() {
        let mut config = mail_config();
        config.from = "not an address".to_string();
        let err = build_message(&config, String::new()).unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
        assert!(err.to_string().contains("mail.from"));
    }

    #[test]
    fn invalid_recipient_is_a_config_error() {
        let mut config = mail_config();
        config.to = "@@".to_string();
        let err = build_message(&config, String::new()).unwrap_err();
        assert!(err.to_string().contains("mail.to"));
    }
}
