//! Notification channel trait

use super::message::Message;
use crate::error::NotifyError;

/// Notification channel
pub trait Notifier: Send + Sync {
    /// Deliver a message to the configured destination
    fn send(&self, message: &Message) -> Result<(), NotifyError>;

    /// Check that the channel's credentials are accepted
    fn verify(&self) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        (**self).send(message)
    }

    fn verify(&self) -> Result<(), NotifyError> {
        (**self).verify()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
