//! Outbound notification port.

use maintflow_types::error::NotifyError;

/// Sends plain-text email.
///
/// Callers in the engine treat delivery as fire-and-forget: a failed send is
/// logged and never changes the outcome reported to the trigger's caller.
pub trait Notifier: Send + Sync {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}
