//! # cipherdesk
//!
//! Client orchestration core for a remote encryption/decryption service.
//! The service owns every cryptographic detail (ciphers, key schedules,
//! padding, modes); this crate owns what happens around the calls:
//! parameter validation and request construction, the result artifact
//! lifecycle, and transient user notifications.
//!
//! ```text
//! user edits params → validate/build request → execute over HTTP
//!         → record artifact + success alert  |  error alert
//! ```
//!
//! A session is two independent workflows (text, file) sharing one alert
//! queue:
//!
//! ```no_run
//! use cipherdesk::artifact::NullClipboard;
//! use cipherdesk::client::ServiceClient;
//! use cipherdesk::workflow::Session;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let base = cipherdesk::config::resolve_base_url()?;
//! let session = Session::new(ServiceClient::new(base)?, Arc::new(NullClipboard));
//!
//! session.text.set_plaintext("attack at dawn");
//! session.text.generate_key().await;
//! session.text.encrypt().await;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod client;
pub mod config;
pub mod notify;
pub mod params;
pub mod request;
pub mod workflow;

pub use client::{OperationOutcome, OperationResult, ServiceClient};
pub use notify::{Alert, AlertHandle, NotificationQueue, Severity};
pub use params::{Algorithm, CipherMode, CryptoParams};
pub use request::{OperationRequest, UploadedFile, ValidationError};
pub use workflow::{FileWorkflow, Session, TextWorkflow};
