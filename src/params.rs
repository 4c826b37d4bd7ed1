//! Shared cipher configuration edited by the user before any operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block cipher selected for an operation. Wire names match the service's
/// string identifiers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "AES")]
    Aes,
    #[serde(rename = "DES")]
    Des,
    #[serde(rename = "3DES")]
    TripleDes,
}

impl Algorithm {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Algorithm::Aes => "AES",
            Algorithm::Des => "DES",
            Algorithm::TripleDes => "3DES",
        }
    }

    /// Key length advertised by the service, surfaced only in UI labels.
    pub fn key_bits(&self) -> u32 {
        match self {
            Algorithm::Aes => 128,
            Algorithm::Des => 64,
            Algorithm::TripleDes => 192,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Block-cipher mode of operation. CBC requires an IV; ECB takes none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherMode {
    #[serde(rename = "ECB")]
    Ecb,
    #[serde(rename = "CBC")]
    Cbc,
}

impl CipherMode {
    pub fn requires_iv(&self) -> bool {
        matches!(self, CipherMode::Cbc)
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The validated configuration shared by the text and file workflows.
///
/// Key and IV are Base64 strings typed or generated by the user. The only
/// client-side check is trimmed emptiness; Base64 well-formedness is the
/// service's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoParams {
    pub algorithm: Algorithm,
    pub mode: CipherMode,
    pub key: String,
    pub iv: String,
}

impl Default for CryptoParams {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Aes,
            mode: CipherMode::Ecb,
            key: String::new(),
            iv: String::new(),
        }
    }
}

impl CryptoParams {
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }

    pub fn has_iv(&self) -> bool {
        !self.iv.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_service_identifiers() {
        assert_eq!(Algorithm::Aes.to_string(), "AES");
        assert_eq!(Algorithm::Des.to_string(), "DES");
        assert_eq!(Algorithm::TripleDes.to_string(), "3DES");
        assert_eq!(CipherMode::Ecb.to_string(), "ECB");
        assert_eq!(CipherMode::Cbc.to_string(), "CBC");
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Algorithm::TripleDes).unwrap(),
            "\"3DES\""
        );
        assert_eq!(serde_json::to_string(&CipherMode::Cbc).unwrap(), "\"CBC\"");
    }

    #[test]
    fn only_cbc_requires_iv() {
        assert!(CipherMode::Cbc.requires_iv());
        assert!(!CipherMode::Ecb.requires_iv());
    }

    #[test]
    fn emptiness_checks_trim_whitespace() {
        let mut params = CryptoParams::default();
        assert!(!params.has_key());
        params.key = "   ".to_string();
        assert!(!params.has_key());
        params.key = "c2VjcmV0".to_string();
        assert!(params.has_key());
        params.iv = " \t".to_string();
        assert!(!params.has_iv());
    }
}
