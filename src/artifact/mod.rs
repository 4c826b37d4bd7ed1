//! Result artifact lifecycle: the latest output per workflow, the transient
//! copy indicator, and fire-and-forget download triggering.


use crate::client::ServiceClient;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;
use url::Url;

/// How long a slot shows "just copied" before reverting.
pub const COPY_INDICATOR_WINDOW: Duration = Duration::from_millis(2000);

/// Output of a successful text operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArtifact {
    pub output: String,
    /// Present when the service generated the IV for a CBC encrypt.
    pub generated_iv: Option<String>,
}

/// Output of a successful file operation, fetchable until the next
/// selection or result supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifact {
    pub filename: String,
    pub download_url: Url,
    pub generated_iv: Option<String>,
}

/// Holds the latest artifact of one workflow. A new success supersedes the
/// previous value; failures never touch it.
#[derive(Clone)]
pub struct ArtifactSlot<T> {
    inner: Arc<Mutex<Option<T>>>,
}

impl<T: Clone> ArtifactSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    pub fn record(&self, artifact: T) {
        *self.inner.lock().unwrap() = Some(artifact);
    }

    pub fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }

    pub fn current(&self) -> Option<T> {
        self.inner.lock().unwrap().clone()
    }
}

impl<T: Clone> Default for ArtifactSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Where copied secrets land. The real clipboard lives outside the core;
/// embedders inject their platform's implementation.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Clipboard that discards writes, for embedders without one.
pub struct NullClipboard;

#[async_trait]
impl Clipboard for NullClipboard {
    async fn write_text(&self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

struct IndicatorInner {
    current: Option<String>,
    revert: Option<JoinHandle<()>>,
}

/// At most one slot label shows "just copied" at a time. Marking a new slot
/// cancels the previous slot's pending reversion.
#[derive(Clone)]
pub struct CopyIndicator {
    inner: Arc<Mutex<IndicatorInner>>,
    window: Duration,
}

impl CopyIndicator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(IndicatorInner {
                current: None,
                revert: None,
            })),
            window: COPY_INDICATOR_WINDOW,
        }
    }

    /// Write `value` through the injected clipboard, then mark `slot` as
    /// copied. A failed clipboard write leaves the indicator untouched.
    pub async fn copy(&self, clipboard: &dyn Clipboard, value: &str, slot: &str) {
        if let Err(err) = clipboard.write_text(value).await {
            warn!(%err, slot, "clipboard write failed");
            return;
        }
        self.mark(slot);
    }

    /// Mark `slot` and schedule its reversion, cancelling any pending one.
    pub fn mark(&self, slot: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pending) = inner.revert.take() {
            pending.abort();
        }
        inner.current = Some(slot.to_string());

        let indicator = self.clone();
        let window = self.window;
        inner.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            indicator.inner.lock().unwrap().current = None;
        }));
    }

    pub fn current(&self) -> Option<String> {
        self.inner.lock().unwrap().current.clone()
    }
}

impl Default for CopyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire-and-forget fetch of a processed file. Not tracked as lifecycle
/// state; a failure only leaves a log line.
pub fn trigger_download(client: &ServiceClient, filename: &str, dest_dir: PathBuf) {
    let client = client.clone();
    let filename = filename.to_string();
    tokio::spawn(async move {
        if let Err(err) = client.download(&filename, &dest_dir).await {
            warn!(%err, filename, "download trigger failed");
        }
    });
}
