// # Notifier Trait
//
// Defines the interface for delivering change notifications.
//
// Delivery is fire-and-forget from the engine's point of view: one send
// per changed zone, no retries, no formatting beyond the subject and the
// plain-text body handed over. A send failure is reported to the caller
// even though the backup write it follows has already succeeded; the
// write is not rolled back.

use async_trait::async_trait;

/// Trait for notification delivery implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    ///
    /// # Parameters
    ///
    /// - `recipient`: Destination address
    /// - `sender`: Originating address
    /// - `subject`: Subject line
    /// - `body`: Plain-text body
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Accepted for delivery
    /// - `Err(Error)`: Delivery failed
    async fn send(
        &self,
        recipient: &str,
        sender: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), crate::Error>;
}
