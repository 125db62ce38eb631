//! Contact form.
//!
//! Submissions are simulated: the service waits as long as a real request
//! would take and reports success. No message leaves the process.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use balance_guru_core::Email;

use crate::error::{add_breadcrumb, Result, StorefrontError};
use crate::events::Notification;

/// Contact form fields. All are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Validate and trim the form.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::MissingField` for a blank field or
    /// `StorefrontError::InvalidEmail`.
    pub fn validate(&self) -> Result<ContactMessage> {
        let name = required("name", &self.name)?;
        let email = Email::parse(required("email", &self.email)?)?;
        let subject = required("subject", &self.subject)?;
        let message = required("message", &self.message)?;

        Ok(ContactMessage {
            name: name.to_string(),
            email,
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(StorefrontError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Simulated contact form backend.
#[derive(Debug, Clone)]
pub struct ContactService {
    delay: Duration,
}

impl ContactService {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Validate the form, wait for the simulated round trip and return the
    /// notification to show.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any delay.
    #[instrument(skip_all)]
    pub async fn submit(&self, form: &ContactForm) -> Result<Notification> {
        let message = form.validate()?;

        tokio::time::sleep(self.delay).await;

        tracing::info!(
            email_domain = %message.email.domain(),
            subject = %message.subject,
            "Contact message accepted"
        );
        add_breadcrumb("contact", "Contact form submitted", None);

        Ok(Notification::message_sent())
    }
}
