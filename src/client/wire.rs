//! Serde bodies and envelopes for the service's HTTP contract.
//! The response envelope is one permissive struct: the service mixes
//! per-endpoint fields freely and omits the rest.

use crate::params::{Algorithm, CipherMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerateKeyBody {
    pub algorithm: Algorithm,
}

#[derive(Debug, Serialize)]
pub struct EncryptTextBody<'a> {
    pub text: &'a str,
    pub key: &'a str,
    pub algorithm: Algorithm,
    pub mode: CipherMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct DecryptTextBody<'a> {
    pub ciphertext: &'a str,
    pub key: &'a str,
    pub algorithm: Algorithm,
    pub mode: CipherMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: bool,
    pub key: Option<String>,
    pub ciphertext: Option<String>,
    pub plaintext: Option<String>,
    pub filename: Option<String>,
    pub iv: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}
