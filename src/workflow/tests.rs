//! End-to-end workflow behavior against a stubbed service: validation
//! short-circuits, alert routing, artifact lifecycle, overlap semantics.

use super::*;
use crate::artifact::NullClipboard;
use crate::notify::Severity;
use crate::params::{Algorithm, CipherMode};
use serde_json::json;
use url::Url;

fn session(server: &mockito::ServerGuard) -> Session {
    let client = ServiceClient::new(Url::parse(&server.url()).unwrap()).unwrap();
    Session::new(client, Arc::new(NullClipboard))
}

fn alert_messages(session: &Session) -> Vec<(String, Severity)> {
    session
        .alerts
        .active()
        .into_iter()
        .map(|a| (a.message, a.severity))
        .collect()
}

#[tokio::test]
async fn validation_failure_issues_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let encrypt = server
        .mock("POST", "/encrypt")
        .expect(0)
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_plaintext("hello");
    session.text.set_mode(CipherMode::Cbc);
    session.text.set_key("a2V5");
    // IV left empty: must fail locally for every algorithm.
    for algorithm in [Algorithm::Aes, Algorithm::Des, Algorithm::TripleDes] {
        session.text.set_algorithm(algorithm);
        session.text.encrypt().await;
    }

    encrypt.assert_async().await;
    let alerts = alert_messages(&session);
    assert_eq!(alerts.len(), 3);
    for (message, severity) in alerts {
        assert_eq!(message, "IV is required for CBC mode");
        assert_eq!(severity, Severity::Error);
    }
}

#[tokio::test]
async fn missing_key_is_reported_before_any_call() {
    let mut server = mockito::Server::new_async().await;
    let decrypt = server
        .mock("POST", "/decrypt")
        .expect(0)
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_ciphertext("Zm9v");
    session.text.decrypt().await;

    decrypt.assert_async().await;
    assert_eq!(
        alert_messages(&session),
        vec![(
            "Please enter the decryption key".to_string(),
            Severity::Error
        )]
    );
}

#[tokio::test]
async fn cbc_encrypt_success_populates_output_and_generated_iv() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "ciphertext": "Zm9v",
                "iv": "MTIzNDU2Nzg5MDEyMzQ1Ng=="
            })
            .to_string(),
        )
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_plaintext("hello");
    session.text.set_mode(CipherMode::Cbc);
    session.text.set_key("a2V5");
    session.text.set_iv("aXY=");
    session.text.encrypt().await;

    let artifact = session.text.artifact().unwrap();
    assert_eq!(artifact.output, "Zm9v");
    assert_eq!(
        artifact.generated_iv.as_deref(),
        Some("MTIzNDU2Nzg5MDEyMzQ1Ng==")
    );
    assert_eq!(
        alert_messages(&session),
        vec![(
            "Text encrypted successfully".to_string(),
            Severity::Success
        )]
    );
    assert!(!session.text.is_busy());
}

#[tokio::test]
async fn domain_failure_leaves_the_prior_artifact_untouched() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt")
        .with_status(200)
        .with_body(json!({"success": true, "ciphertext": "Zmlyc3Q="}).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/decrypt")
        .with_status(400)
        .with_body(json!({"success": false, "error": "bad key length"}).to_string())
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_plaintext("hello");
    session.text.set_key("a2V5");
    session.text.encrypt().await;
    assert_eq!(session.text.artifact().unwrap().output, "Zmlyc3Q=");

    session.text.set_ciphertext("Zmlyc3Q=");
    session.text.decrypt().await;

    // One success from the encrypt, exactly one error from the decrypt.
    let alerts = alert_messages(&session);
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[1], ("bad key length".to_string(), Severity::Error));
    assert_eq!(session.text.artifact().unwrap().output, "Zmlyc3Q=");
}

#[tokio::test]
async fn generate_key_writes_the_key_into_the_parameters() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/generate_key")
        .with_status(200)
        .with_body(json!({"success": true, "key": "bmV3a2V5"}).to_string())
        .create_async()
        .await;

    let session = session(&server);
    session.file.set_algorithm(Algorithm::TripleDes);
    session.file.generate_key().await;

    assert_eq!(session.file.params().key, "bmV3a2V5");
    assert_eq!(
        alert_messages(&session),
        vec![(
            "Generated 3DES key successfully".to_string(),
            Severity::Success
        )]
    );
}

#[tokio::test]
async fn selecting_a_new_file_clears_the_artifact_but_not_the_parameters() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt_file")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "filename": "encrypted_1_a.bin",
                "iv": "ZmlsZWl2"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let session = session(&server);
    session.file.set_mode(CipherMode::Cbc);
    session.file.set_key("a2V5");
    session.file.set_iv("aXY=");
    session.file.select_file("a.bin", vec![1u8, 2, 3]);
    session.file.encrypt().await;

    let artifact = session.file.artifact().unwrap();
    assert_eq!(artifact.filename, "encrypted_1_a.bin");
    assert_eq!(artifact.generated_iv.as_deref(), Some("ZmlsZWl2"));

    session.file.select_file("b.bin", vec![4u8, 5]);

    assert!(session.file.artifact().is_none());
    let params = session.file.params();
    assert_eq!(params.key, "a2V5");
    assert_eq!(params.mode, CipherMode::Cbc);
    assert_eq!(params.iv, "aXY=");
    assert_eq!(session.file.selected_file().unwrap().name, "b.bin");
}

#[tokio::test]
async fn file_selection_enqueues_an_info_alert() {
    let server = mockito::Server::new_async().await;
    let session = session(&server);
    session.file.select_file("report.pdf", vec![0u8; 8]);

    assert_eq!(
        alert_messages(&session),
        vec![("Selected file: report.pdf".to_string(), Severity::Info)]
    );
}

#[tokio::test]
async fn file_operation_without_selection_fails_locally() {
    let mut server = mockito::Server::new_async().await;
    let encrypt_file = server
        .mock("POST", "/encrypt_file")
        .expect(0)
        .create_async()
        .await;

    let session = session(&server);
    session.file.set_key("a2V5");
    session.file.encrypt().await;

    encrypt_file.assert_async().await;
    assert_eq!(
        alert_messages(&session),
        vec![(
            "Please select a file to encrypt".to_string(),
            Severity::Error
        )]
    );
}

#[tokio::test]
async fn workflows_keep_disjoint_result_state() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt")
        .with_status(200)
        .with_body(json!({"success": true, "ciphertext": "dGV4dA=="}).to_string())
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_plaintext("hello");
    session.text.set_key("a2V5");
    session.text.encrypt().await;
    assert!(session.text.artifact().is_some());

    // File-side activity must not disturb the text result.
    session.file.select_file("a.bin", vec![1u8]);
    assert!(session.text.artifact().is_some());
    assert!(session.file.artifact().is_none());

    // And the file workflow's parameters are its own.
    session.file.set_key("b3RoZXI=");
    assert_eq!(session.text.params().key, "a2V5");
}

#[tokio::test]
async fn overlapping_operations_both_resolve_and_last_response_wins() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt")
        .expect(2)
        .with_status(200)
        .with_body(json!({"success": true, "ciphertext": "cmFjZQ=="}).to_string())
        .create_async()
        .await;

    let session = session(&server);
    session.text.set_plaintext("hello");
    session.text.set_key("a2V5");

    // The busy flag is advisory; nothing stops concurrent triggers. Both
    // responses land, the later write is the one displayed.
    futures::future::join(session.text.encrypt(), session.text.encrypt()).await;

    assert_eq!(session.text.artifact().unwrap().output, "cmFjZQ==");
    let alerts = alert_messages(&session);
    assert_eq!(alerts.len(), 2);
    assert!(alerts
        .iter()
        .all(|(m, s)| m == "Text encrypted successfully" && *s == Severity::Success));
    assert!(!session.text.is_busy());
}

#[tokio::test]
async fn trigger_download_saves_the_artifact() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/encrypt_file")
        .with_status(200)
        .with_body(json!({"success": true, "filename": "encrypted_2_a.bin"}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/download/encrypted_2_a.bin")
        .with_status(200)
        .with_body(&[9u8, 9, 9][..])
        .create_async()
        .await;

    let session = session(&server);
    session.file.set_key("a2V5");
    session.file.select_file("a.bin", vec![1u8, 2, 3]);
    session.file.encrypt().await;

    let dir = tempfile::tempdir().unwrap();
    session.file.trigger_download(dir.path().to_path_buf());

    // Fire-and-forget: poll briefly for the spawned fetch to land.
    let dest = dir.path().join("encrypted_2_a.bin");
    for _ in 0..50 {
        if dest.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(std::fs::read(&dest).unwrap(), vec![9, 9, 9]);
}
