//! Outgoing account emails.
//!
//! No SMTP transport is wired in; `LogMailer` writes the message to the log so
//! an operator can follow links during development. `MemoryMailer` keeps the
//! messages for inspection.

use std::sync::Mutex;

use async_trait::async_trait;
use log::info;

use crate::errors::ApiError;
use crate::utils::log_sanitizer::mask_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Verification,
    Invitation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub kind: EmailKind,
    pub to: String,
    pub link: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError> {
        info!(
            "Sending {:?} email to {}: {}",
            email.kind,
            mask_email(&email.to),
            email.link
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<OutgoingEmail> {
        self.sent().into_iter().rev().find(|e| e.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError> {
        self.sent
            .lock()
            .map_err(|_| ApiError::internal("mailer outbox poisoned"))?
            .push(email);
        Ok(())
    }
}
