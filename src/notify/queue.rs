//! Alert queue: monotonic identities, independent expiry timers, idempotent
//! dismissal.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// How long an alert stays visible unless dismissed first.
pub const ALERT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// A live notification. Identity is a monotonic token; two alerts with the
/// same message are still distinct.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Opaque handle returned by `enqueue`, usable for early dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertHandle(u64);

struct ActiveAlert {
    alert: Alert,
    expiry: JoinHandle<()>,
}

struct QueueInner {
    next_id: u64,
    active: Vec<ActiveAlert>,
}

/// Public handle to the queue. Clones share the same active set.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Mutex<QueueInner>>,
    ttl: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_ttl(ALERT_TTL)
    }

    /// TTL override for embedders that want shorter-lived alerts.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                next_id: 0,
                active: Vec::new(),
            })),
            ttl,
        }
    }

    /// Insert a new alert and schedule its expiry. The expiry timer is owned
    /// by the queue and aborted on early dismissal so a stale timer never
    /// fires after the alert is already gone.
    pub fn enqueue(&self, message: impl Into<String>, severity: Severity) -> AlertHandle {
        let message = message.into();
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        let queue = self.clone();
        let ttl = self.ttl;
        let expiry = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            queue.remove(id);
        });

        debug!(id, ?severity, "alert enqueued");
        inner.active.push(ActiveAlert {
            alert: Alert {
                id,
                message,
                severity,
                created_at: Utc::now(),
            },
            expiry,
        });
        AlertHandle(id)
    }

    /// Dismiss an alert early. No-op if it already expired or was dismissed.
    pub fn dismiss(&self, handle: &AlertHandle) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pos) = inner.active.iter().position(|a| a.alert.id == handle.0) {
            let entry = inner.active.remove(pos);
            entry.expiry.abort();
            debug!(id = handle.0, "alert dismissed");
        }
    }

    /// Snapshot of currently active alerts in arrival order.
    pub fn active(&self) -> Vec<Alert> {
        let inner = self.inner.lock().unwrap();
        inner.active.iter().map(|a| a.alert.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().active.is_empty()
    }

    fn remove(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pos) = inner.active.iter().position(|a| a.alert.id == id) {
            inner.active.remove(pos);
            debug!(id, "alert expired");
        }
    }
}
