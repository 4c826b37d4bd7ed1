//! File workflow: encrypt/decrypt an uploaded file, generate keys, trigger
//! downloads of the processed artifact.

use crate::artifact::{self, ArtifactSlot, Clipboard, CopyIndicator, FileArtifact};
use crate::client::{OperationOutcome, OperationResult, ServiceClient};
use crate::notify::{NotificationQueue, Severity};
use crate::params::{Algorithm, CipherMode, CryptoParams};
use crate::request::{OperationRequest, UploadedFile};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

struct FileState {
    params: CryptoParams,
    file: Option<UploadedFile>,
    busy: bool,
}

/// Owns the file-side parameters, selection, and result slot. Disjoint from
/// the text workflow apart from the shared alert sink.
pub struct FileWorkflow {
    state: Arc<Mutex<FileState>>,
    artifact: ArtifactSlot<FileArtifact>,
    copy: CopyIndicator,
    clipboard: Arc<dyn Clipboard>,
    client: ServiceClient,
    alerts: NotificationQueue,
}

impl FileWorkflow {
    pub fn new(
        client: ServiceClient,
        alerts: NotificationQueue,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(FileState {
                params: CryptoParams::default(),
                file: None,
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

    /// Replace the selection. Clears any previous result artifact (download
    /// reference and derived IV) but leaves the cipher parameters alone, so
    /// decrypt-after-encrypt keeps working with the same key and IV.
    pub fn select_file(&self, name: &str, content: impl Into<Bytes>) {
        let file = UploadedFile::new(name, content.into());
        self.artifact.clear();
        self.state.lock().unwrap().file = Some(file);
        self.alerts
            .enqueue(format!("Selected file: {name}"), Severity::Info);
    }

    pub fn selected_file(&self) -> Option<UploadedFile> {
        self.state.lock().unwrap().file.clone()
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

    /// Advisory; see `TextWorkflow::is_busy`.
    pub fn is_busy(&self) -> bool {
        self.state.lock().unwrap().busy
    }

    pub fn artifact(&self) -> Option<FileArtifact> {
        self.artifact.current()
    }

    pub fn copied_slot(&self) -> Option<String> {
        self.copy.current()
    }

    pub async fn copy_secret(&self, value: &str, slot: &str) {
        self.copy.copy(self.clipboard.as_ref(), value, slot).await;
    }

    /// Fire-and-forget fetch of the current artifact into `dest_dir`.
    /// No-op when nothing has been produced yet.
    pub fn trigger_download(&self, dest_dir: PathBuf) {
        match self.artifact.current() {
            Some(artifact) => {
                artifact::trigger_download(&self.client, &artifact.filename, dest_dir)
            }
            None => warn!("download triggered with no file artifact"),
        }
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
        self.run_file_operation(true).await;
    }

    pub async fn decrypt(&self) {
        self.run_file_operation(false).await;
    }

    async fn run_file_operation(&self, encrypt: bool) {
        let (file, params) = {
            let state = self.state.lock().unwrap();
            (state.file.clone(), state.params.clone())
        };
        let built = if encrypt {
            OperationRequest::encrypt_file(file.as_ref(), &params)
        } else {
            OperationRequest::decrypt_file(file.as_ref(), &params)
        };
        let request = match built {
            Ok(request) => request,
            Err(err) => {
                self.alerts.enqueue(err.to_string(), Severity::Error);
                return;
            }
        };

        self.set_busy(true);
        match self.client.execute(request).await {
            OperationOutcome::Success(OperationResult::File {
                filename,
                download_url,
                iv,
            }) => {
                self.artifact.record(FileArtifact {
                    filename,
                    download_url,
                    generated_iv: iv,
                });
                let message = if encrypt {
                    "File encrypted successfully"
                } else {
                    "File decrypted successfully"
                };
                self.alerts.enqueue(message, Severity::Success);
            }
            OperationOutcome::Success(other) => {
                warn!(?other, "mismatched result for file operation")
            }
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
