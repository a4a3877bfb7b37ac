pub mod webhook;

use async_trait::async_trait;

use crate::app::Result;

pub use webhook::WebhookNotifier;

/// Dispatch seam for the aggregated digest. The pipeline only needs
/// `send(subject, body)`; the channel behind it is a collaborator.
#[async_trait]
pub trait Notifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}

/// Prints the digest to stdout. Used for local runs and `--dry-run`.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        println!("{}\n\n{}", subject, body);
        Ok(())
    }
}
