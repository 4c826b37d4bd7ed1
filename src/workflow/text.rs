//! Text workflow: encrypt/decrypt free-form text, generate keys.

use crate::artifact::{ArtifactSlot, Clipboard, CopyIndicator, TextArtifact};
use crate::client::{OperationOutcome, OperationResult, ServiceClient};
use crate::notify::{NotificationQueue, Severity};
use crate::params::{Algorithm, CipherMode, CryptoParams};
use crate::request::OperationRequest;
use std::sync::{Arc, Mutex};
use tracing::warn;

struct TextState {
    params: CryptoParams,
    plaintext: String,
    ciphertext: String,
    busy: bool,
}

/// Owns the text-side parameters, inputs, and result slot. Alerts go to the
/// injected session queue.
pub struct TextWorkflow {
    state: Arc<Mutex<TextState>>,
    artifact: ArtifactSlot<TextArtifact>,
    copy: CopyIndicator,
    clipboard: Arc<dyn Clipboard>,
    client: ServiceClient,
    alerts: NotificationQueue,
}

impl TextWorkflow {
    pub fn new(
        client: ServiceClient,
        alerts: NotificationQueue,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TextState {
                params: CryptoParams::default(),
                plaintext: String::new(),
                ciphertext: String::new(),
                busy: false,
            })),
            artifact: ArtifactSlot::new(),
            copy: CopyIndicator::new(),
            clipboard,
            client,
            alerts,
        }
    }

    /* ---------- parameter edits ---------- */

    pub fn set_plaintext(&self, text: impl Into<String>) {
        self.state.lock().unwrap().plaintext = text.into();
    }

    pub fn set_ciphertext(&self, ciphertext: impl Into<String>) {
        self.state.lock().unwrap().ciphertext = ciphertext.into();
    }

    pub fn set_key(&self, key: impl Into<String>) {
        self.state.lock().unwrap().params.key = key.into();
    }

    pub fn set_iv(&self, iv: impl Into<String>) {
        self.state.lock().unwrap().params.iv = iv.into();
    }

    pub fn set_algorithm(&self, algorithm: Algorithm) {
        self.state.lock().unwrap().params.algorithm = algorithm;
    }

    pub fn set_mode(&self, mode: CipherMode) {
        self.state.lock().unwrap().params.mode = mode;
    }

    pub fn params(&self) -> CryptoParams {
        self.state.lock().unwrap().params.clone()
    }

    /// Advisory flag for disabling triggers while an operation is out.
    /// Nothing here enforces it; overlapping operations resolve
    /// last-response-wins.
    pub fn is_busy(&self) -> bool {
        self.state.lock().unwrap().busy
    }

    pub fn artifact(&self) -> Option<TextArtifact> {
        self.artifact.current()
    }

    pub fn copied_slot(&self) -> Option<String> {
        self.copy.current()
    }

    pub async fn copy_secret(&self, value: &str, slot: &str) {
        self.copy.copy(self.clipboard.as_ref(), value, slot).await;
    }

    /* ---------- operations ---------- */

    pub async fn generate_key(&self) {
        let algorithm = self.state.lock().unwrap().params.algorithm;
        let request = OperationRequest::generate_key(algorithm);

        self.set_busy(true);
        match self.client.execute(request).await {
            OperationOutcome::Success(OperationResult::KeyGenerated { key, algorithm }) => {
                self.state.lock().unwrap().params.key = key;
                self.alerts.enqueue(
                    format!("Generated {algorithm} key successfully"),
                    Severity::Success,
                );
            }
            OperationOutcome::Success(other) => {
                warn!(?other, "mismatched result for key generation")
            }
            OperationOutcome::Failure { message } => {
                self.alerts.enqueue(message, Severity::Error);
            }
        }
        self.set_busy(false);
    }

    pub async fn encrypt(&self) {
        let (text, params) = {
            let state = self.state.lock().unwrap();
            (state.plaintext.clone(), state.params.clone())
        };
        let request = match OperationRequest::encrypt_text(&text, &params) {
            Ok(request) => request,
            Err(err) => {
                self.alerts.enqueue(err.to_string(), Severity::Error);
                return;
            }
        };

        self.set_busy(true);
        match self.client.execute(request).await {
            OperationOutcome::Success(OperationResult::Text { output, iv }) => {
                self.artifact.record(TextArtifact {
                    output,
                    generated_iv: iv,
                });
                self.alerts
                    .enqueue("Text encrypted successfully", Severity::Success);
            }
            OperationOutcome::Success(other) => warn!(?other, "mismatched result for encrypt"),
            OperationOutcome::Failure { message } => {
                self.alerts.enqueue(message, Severity::Error);
            }
        }
        self.set_busy(false);
    }

    pub async fn decrypt(&self) {
        let (ciphertext, params) = {
            let state = self.state.lock().unwrap();
            (state.ciphertext.clone(), state.params.clone())
        };
        let request = match OperationRequest::decrypt_text(&ciphertext, &params) {
            Ok(request) => request,
            Err(err) => {
                self.alerts.enqueue(err.to_string(), Severity::Error);
                return;
            }
        };

        self.set_busy(true);
        match self.client.execute(request).await {
            OperationOutcome::Success(OperationResult::Text { output, iv }) => {
                self.artifact.record(TextArtifact {
                    output,
                    generated_iv: iv,
                });
                self.alerts
                    .enqueue("Text decrypted successfully", Severity::Success);
            }
            OperationOutcome::Success(other) => warn!(?other, "mismatched result for decrypt"),
            OperationOutcome::Failure { message } => {
                self.alerts.enqueue(message, Severity::Error);
            }
        }
        self.set_busy(false);
    }

    fn set_busy(&self, busy: bool) {
        self.state.lock().unwrap().busy = busy;
    }
}
