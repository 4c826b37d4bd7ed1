//! Turns user-edited parameters plus an operation kind into an immutable,
//! fully validated request — or a validation failure, before any network
//! access happens.

use crate::params::{Algorithm, CipherMode, CryptoParams};
use bytes::Bytes;
use uuid::Uuid;


/// Which way an operation runs. Only affects the message a validation
/// failure surfaces to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Local validation failures. Detected before the executor is ever invoked;
/// messages are exactly what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingKey(Direction),
    MissingIv(Direction),
    EmptyInput(Direction),
    NoFileSelected(Direction),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Direction::*;
        let msg = match self {
            ValidationError::MissingKey(Encrypt) => "Please enter or generate a key",
            ValidationError::MissingKey(Decrypt) => "Please enter the decryption key",
            ValidationError::MissingIv(Encrypt) => "IV is required for CBC mode",
            ValidationError::MissingIv(Decrypt) => "IV is required for CBC mode decryption",
            ValidationError::EmptyInput(Encrypt) => "Please enter text to encrypt",
            ValidationError::EmptyInput(Decrypt) => "Please enter ciphertext to decrypt",
            ValidationError::NoFileSelected(Encrypt) => "Please select a file to encrypt",
            ValidationError::NoFileSelected(Decrypt) => "Please select a file to decrypt",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ValidationError {}

/// User-selected binary content plus its display name.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Snapshot of the parameters a request was built from. The IV is dropped
/// here, not at serialization time: under ECB the snapshot never holds one,
/// even if a stale value lingers in the UI field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSnapshot {
    pub key: String,
    pub algorithm: Algorithm,
    pub mode: CipherMode,
    pub iv: Option<String>,
}

impl ParamSnapshot {
    fn capture(params: &CryptoParams, direction: Direction) -> Result<Self, ValidationError> {
        if !params.has_key() {
            return Err(ValidationError::MissingKey(direction));
        }
        if params.mode.requires_iv() && !params.has_iv() {
            return Err(ValidationError::MissingIv(direction));
        }
        Ok(Self {
            key: params.key.clone(),
            algorithm: params.algorithm,
            mode: params.mode,
            iv: params
                .mode
                .requires_iv()
                .then(|| params.iv.clone()),
        })
    }
}

/// The five operations the service understands.
#[derive(Debug, Clone)]
pub enum OperationKind {
    GenerateKey {
        algorithm: Algorithm,
    },
    EncryptText {
        text: String,
        params: ParamSnapshot,
    },
    DecryptText {
        ciphertext: String,
        params: ParamSnapshot,
    },
    EncryptFile {
        file: UploadedFile,
        params: ParamSnapshot,
    },
    DecryptFile {
        file: UploadedFile,
        params: ParamSnapshot,
    },
}

/// A validated, immutable request. Built only by the constructors below and
/// consumed by value exactly once by the executor. The id correlates log
/// lines across the dispatch.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    id: Uuid,
    kind: OperationKind,
}

impl OperationRequest {
    fn new(kind: OperationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    /// Key generation has no precondition beyond a selected algorithm.
    pub fn generate_key(algorithm: Algorithm) -> Self {
        Self::new(OperationKind::GenerateKey { algorithm })
    }

    pub fn encrypt_text(text: &str, params: &CryptoParams) -> Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyInput(Direction::Encrypt));
        }
        let params = ParamSnapshot::capture(params, Direction::Encrypt)?;
        Ok(Self::new(OperationKind::EncryptText {
            text: text.to_string(),
            params,
        }))
    }

    pub fn decrypt_text(ciphertext: &str, params: &CryptoParams) -> Result<Self, ValidationError> {
        if ciphertext.trim().is_empty() {
            return Err(ValidationError::EmptyInput(Direction::Decrypt));
        }
        let params = ParamSnapshot::capture(params, Direction::Decrypt)?;
        Ok(Self::new(OperationKind::DecryptText {
            ciphertext: ciphertext.to_string(),
            params,
        }))
    }

    pub fn encrypt_file(
        file: Option<&UploadedFile>,
        params: &CryptoParams,
    ) -> Result<Self, ValidationError> {
        let file = file
            .ok_or(ValidationError::NoFileSelected(Direction::Encrypt))?
            .clone();
        let params = ParamSnapshot::capture(params, Direction::Encrypt)?;
        Ok(Self::new(OperationKind::EncryptFile { file, params }))
    }

    pub fn decrypt_file(
        file: Option<&UploadedFile>,
        params: &CryptoParams,
    ) -> Result<Self, ValidationError> {
        let file = file
            .ok_or(ValidationError::NoFileSelected(Direction::Decrypt))?
            .clone();
        let params = ParamSnapshot::capture(params, Direction::Decrypt)?;
        Ok(Self::new(OperationKind::DecryptFile { file, params }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn into_kind(self) -> OperationKind {
        self.kind
    }

    /// Error text shown when the service rejects the operation without
    /// giving a reason of its own.
    pub fn fallback_error(&self) -> &'static str {
        match &self.kind {
            OperationKind::GenerateKey { .. } => "Failed to generate key",
            OperationKind::EncryptText { .. } => "Encryption failed",
            OperationKind::DecryptText { .. } => "Decryption failed",
            OperationKind::EncryptFile { .. } => "File encryption failed",
            OperationKind::DecryptFile { .. } => "File decryption failed",
        }
    }
}
