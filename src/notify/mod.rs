//! Transient user notifications with per-alert auto-expiry.
//! The queue is owned by the session and handed to each workflow as a
//! cheap-clone sink.

pub mod queue;

pub use queue::{Alert, AlertHandle, NotificationQueue, Severity, ALERT_TTL};
