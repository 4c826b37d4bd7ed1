//! The two independent usage contexts (text, file) and the session that
//! wires them to one shared alert sink.

pub mod file;
pub mod text;

#[cfg(test)]
mod tests;

pub use file::FileWorkflow;
pub use text::TextWorkflow;

use crate::artifact::Clipboard;
use crate::client::ServiceClient;
use crate::notify::NotificationQueue;
use std::sync::Arc;

/// One single-user session: both workflows share the alert queue as a
/// write-only sink and nothing else.
pub struct Session {
    pub alerts: NotificationQueue,
    pub text: TextWorkflow,
    pub file: FileWorkflow,
}

impl Session {
    pub fn new(client: ServiceClient, clipboard: Arc<dyn Clipboard>) -> Self {
        let alerts = NotificationQueue::new();
        Self {
            text: TextWorkflow::new(client.clone(), alerts.clone(), clipboard.clone()),
            file: FileWorkflow::new(client, alerts.clone(), clipboard),
            alerts,
        }
    }
}
