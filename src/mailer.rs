//! Email notifier.
//!
//! Reminders go through an mpsc queue drained by a single background task;
//! callers only enqueue and never block on SMTP. Send failures are logged
//! and dropped, never retried. There is no deduplication: two sweeps on the
//! same day produce two emails.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::MailConfig;
use crate::store::LoanRecord;

/// One queued message.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Seam between the queue and the actual relay, so tests can substitute a
/// recording transport.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, email: &Email) -> Result<()>;
}

/// SMTP relay over implicit TLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let username = config
            .username
            .clone()
            .context("EMAIL environment variable not set")?;
        let password = config
            .password
            .clone()
            .context("PASSWORD environment variable not set")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();
        let from = config.from.parse().context("Invalid sender address")?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse().context("Invalid recipient address")?)
            .subject(email.subject.clone())
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Handle to the send queue. Dropping it (or calling [`Notifier::shutdown`])
/// closes the queue; the worker drains what is left and exits.
pub struct Notifier {
    tx: mpsc::UnboundedSender<Email>,
    worker: JoinHandle<()>,
}

impl Notifier {
    /// Spawn the send worker and return the enqueue handle.
    pub fn spawn(transport: Arc<dyn MailTransport>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Email>();

        let worker = tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                match transport.send(&email).await {
                    Ok(()) => info!("Reminder sent to {}", email.to),
                    Err(e) => error!("Failed to send reminder to {}: {}", email.to, e),
                }
            }
        });

        Self { tx, worker }
    }

    /// Queue a message without waiting for the send.
    pub fn enqueue(&self, email: Email) {
        if self.tx.send(email).is_err() {
            warn!("Mail worker is gone, reminder dropped");
        }
    }

    /// Close the queue and wait until every queued send has been attempted.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            error!("Mail worker panicked: {}", e);
        }
    }
}

/// Build the reminder for a loan that reached its notification date.
pub fn reminder_email(record: &LoanRecord, loan_days: u64) -> Email {
    Email {
        to: record.email.clone(),
        subject: "Advertencia de Vencimiento de Préstamo".to_string(),
        body: format!(
            "Estimado usuario, han pasado {} días desde que ingresaste el libro \"{}\". \
             Por favor, renueva tu préstamo o devuélvelo pronto.",
            loan_days, record.name
        ),
    }
}
