//! Customer notifications.
//!
//! Delivery is fire-and-forget: callers log a failed send and carry on.
//! Nothing here touches ledger state.

use thiserror::Error;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Recipient address is unusable.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    /// Transport failed to deliver.
    #[error("Failed to send notification: {0}")]
    SendError(String),
}

/// A message addressed to one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient email.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Notification {
    /// Welcome message sent after registration.
    #[must_use]
    pub fn welcome(username: &str, email: &str) -> Self {
        Self {
            to: email.to_string(),
            subject: "Welcome to Tally!".to_string(),
            body: format!("Hello {username},\n\nThank you for registering at Tally."),
        }
    }
}

/// Outbound notification transport.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the message cannot be delivered.
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Transport that writes notifications to the log.
///
/// When disabled, messages are skipped with a debug line instead.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    enabled: bool,
    from: String,
}

impl LogNotifier {
    /// Creates a log transport sending as `from`.
    #[must_use]
    pub fn new(enabled: bool, from: impl Into<String>) -> Self {
        Self {
            enabled,
            from: from.into(),
        }
    }

    /// Creates a log transport from notification settings.
    #[must_use]
    pub fn from_config(config: &tally_shared::NotificationConfig) -> Self {
        Self::new(config.enabled, config.from_address.clone())
    }
}

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !notification.to.contains('@') {
            return Err(NotifyError::InvalidAddress(notification.to.clone()));
        }

        if !self.enabled {
            tracing::debug!(
                to = %notification.to,
                subject = %notification.subject,
                "Notifications disabled, skipping"
            );
            return Ok(());
        }

        tracing::info!(
            from = %self.from,
            to = %notification.to,
            subject = %notification.subject,
            "Notification sent"
        );
        Ok(())
    }
}
