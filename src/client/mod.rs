//! Operation executor: one network call per request, no retries, every
//! failure folded into an outcome the caller can route to the alert queue.

pub mod wire;


use crate::params::Algorithm;
use crate::request::{OperationKind, OperationRequest, ParamSnapshot, UploadedFile};
use anyhow::Context;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;
use wire::ResponseEnvelope;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What a successful operation produced.
#[derive(Debug, Clone)]
pub enum OperationResult {
    KeyGenerated {
        key: String,
        algorithm: Algorithm,
    },
    Text {
        output: String,
        iv: Option<String>,
    },
    File {
        filename: String,
        download_url: Url,
        iv: Option<String>,
    },
}

/// Terminal outcome of an execution. The executor never returns `Err` past
/// its boundary; failures carry the message shown to the user.
#[derive(Debug, Clone)]
pub enum OperationOutcome {
    Success(OperationResult),
    Failure { message: String },
}

/// Internal failure taxonomy: connectivity problems are distinct from the
/// service declaring the operation failed. Display is the user message.
#[derive(Debug, Error)]
enum ExecuteError {
    #[error("Failed to connect to server")]
    Connectivity(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}

/// HTTP client bound to one service base address for the session.
#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base: Url,
}

impl ServiceClient {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Where a processed file can be fetched from.
    pub fn download_url(&self, filename: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.url(&format!("download/{filename}")))
    }

    /// Dispatch exactly one network call for the request. All failures are
    /// converted into `OperationOutcome::Failure`.
    pub async fn execute(&self, request: OperationRequest) -> OperationOutcome {
        let id = request.id();
        match self.dispatch(request).await {
            Ok(result) => {
                info!(%id, "operation succeeded");
                OperationOutcome::Success(result)
            }
            Err(err) => {
                match &err {
                    ExecuteError::Connectivity(cause) => {
                        error!(%id, %cause, "transport failure")
                    }
                    ExecuteError::Rejected(message) => {
                        warn!(%id, %message, "operation rejected by service")
                    }
                }
                OperationOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn dispatch(&self, request: OperationRequest) -> Result<OperationResult, ExecuteError> {
        let fallback = request.fallback_error();
        match request.into_kind() {
            OperationKind::GenerateKey { algorithm } => {
                let envelope = self
                    .post_json("generate_key", &wire::GenerateKeyBody { algorithm })
                    .await?;
                let mut envelope = accepted(envelope, fallback)?;
                let key = take_field(envelope.key.take(), fallback)?;
                Ok(OperationResult::KeyGenerated { key, algorithm })
            }
            OperationKind::EncryptText { text, params } => {
                let body = wire::EncryptTextBody {
                    text: &text,
                    key: &params.key,
                    algorithm: params.algorithm,
                    mode: params.mode,
                    iv: params.iv.as_deref(),
                };
                let envelope = self.post_json("encrypt", &body).await?;
                let mut envelope = accepted(envelope, fallback)?;
                let output = take_field(envelope.ciphertext.take(), fallback)?;
                Ok(OperationResult::Text {
                    output,
                    iv: envelope.iv.take(),
                })
            }
            OperationKind::DecryptText { ciphertext, params } => {
                let body = wire::DecryptTextBody {
                    ciphertext: &ciphertext,
                    key: &params.key,
                    algorithm: params.algorithm,
                    mode: params.mode,
                    iv: params.iv.as_deref(),
                };
                let envelope = self.post_json("decrypt", &body).await?;
                let mut envelope = accepted(envelope, fallback)?;
                let output = take_field(envelope.plaintext.take(), fallback)?;
                Ok(OperationResult::Text { output, iv: None })
            }
            OperationKind::EncryptFile { file, params } => {
                let envelope = self.post_file("encrypt_file", file, params).await?;
                self.file_result(envelope, fallback)
            }
            OperationKind::DecryptFile { file, params } => {
                let envelope = self.post_file("decrypt_file", file, params).await?;
                self.file_result(envelope, fallback)
            }
        }
    }

    fn file_result(
        &self,
        envelope: ResponseEnvelope,
        fallback: &str,
    ) -> Result<OperationResult, ExecuteError> {
        let mut envelope = accepted(envelope, fallback)?;
        let filename = take_field(envelope.filename.take(), fallback)?;
        let download_url = self
            .download_url(&filename)
            .map_err(|_| ExecuteError::Rejected(fallback.to_string()))?;
        Ok(OperationResult::File {
            filename,
            download_url,
            iv: envelope.iv.take(),
        })
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope, ExecuteError> {
        // The service reports domain failures as 4xx with a JSON envelope,
        // so the status code is not consulted; an unparsable body is a
        // connectivity problem.
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(response.json().await?)
    }

    async fn post_file(
        &self,
        path: &str,
        file: UploadedFile,
        params: ParamSnapshot,
    ) -> Result<ResponseEnvelope, ExecuteError> {
        let part = Part::stream(reqwest::Body::from(file.content)).file_name(file.name);
        let mut form = Form::new()
            .part("file", part)
            .text("key", params.key)
            .text("algorithm", params.algorithm.wire_name())
            .text("mode", params.mode.wire_name());
        if let Some(iv) = params.iv {
            form = form.text("iv", iv);
        }
        let response = self.http.post(self.url(path)).multipart(form).send().await?;
        Ok(response.json().await?)
    }

    /// Liveness probe against the service's health endpoint.
    pub async fn health(&self) -> bool {
        match self.http.get(self.url("health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(%err, "health probe failed");
                false
            }
        }
    }

    /// Fetch a processed artifact and write it under `dest_dir`, keeping the
    /// service-issued filename.
    pub async fn download(&self, filename: &str, dest_dir: &Path) -> anyhow::Result<PathBuf> {
        let url = self.url(&format!("download/{filename}"));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("download request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("download rejected: HTTP {}", response.status());
        }
        let data = response.bytes().await.context("download body unreadable")?;
        let dest = dest_dir.join(filename);
        tokio::fs::write(&dest, &data)
            .await
            .with_context(|| format!("failed to write {}", dest.display()))?;
        Ok(dest)
    }
}

/// Gate on the envelope's success flag: a false flag is a domain failure
/// carrying the service's message, or the per-operation fallback.
fn accepted(envelope: ResponseEnvelope, fallback: &str) -> Result<ResponseEnvelope, ExecuteError> {
    if envelope.success {
        Ok(envelope)
    } else {
        Err(ExecuteError::Rejected(
            envelope.error.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

/// A success envelope missing its payload field is not trusted.
fn take_field(field: Option<String>, fallback: &str) -> Result<String, ExecuteError> {
    field.ok_or_else(|| ExecuteError::Rejected(fallback.to_string()))
}
