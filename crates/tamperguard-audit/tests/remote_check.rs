use std::path::PathBuf;
use std::time::Duration;

use tamperguard_audit::{
    sha256_bytes, BinaryHasher, BundleInfo, CheckPreset, ProcessImageLocator, ReferenceSource,
    ReferenceStore, TamperEvaluator,
};
use tamperguard_client::{EndpointConfig, ReferenceClient};
use tamperguard_core::{CheckKind, ReferenceKey, ReportError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODULE: &str = "IOSSecuritySuite";

fn bundle_dir() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let provision = dir.path().join("embedded.mobileprovision");
    std::fs::write(&provision, b"provisioning profile").unwrap();
    let module = dir.path().join(MODULE);
    std::fs::write(&module, b"framework image").unwrap();
    (dir, provision, module)
}

async fn serve(server: &MockServer, resource: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/Values/{resource}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{body}\n")))
        .mount(server)
        .await;
}

fn store() -> ReferenceStore {
    let client = ReferenceClient::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    ReferenceStore::new(client)
}

fn keys() -> Vec<ReferenceKey> {
    vec![
        ReferenceKey::BundleId,
        ReferenceKey::ProvisionHash,
        ReferenceKey::ImageHash(MODULE.into()),
        ReferenceKey::MainImageHash,
    ]
}

#[tokio::test]
async fn not_found_key_leaves_others_loaded() {
    let server = MockServer::start().await;
    serve(&server, "BundleId", "com.example.app").await;
    serve(&server, "MachOHash", "bb").await;
    serve(&server, "MainBinaryHash", "cc").await;
    // ProvisionHash is not mounted: wiremock answers 404.

    let endpoints = EndpointConfig::default()
        .with_template(format!("{}/Values/{{key}}", server.uri()))
        .endpoints_for(&keys())
        .unwrap();

    let store = store();
    let summary = store.load(ReferenceSource::Remote(endpoints)).await;

    assert_eq!(summary.absent, vec![ReferenceKey::ProvisionHash]);
    assert_eq!(store.get(&ReferenceKey::BundleId).unwrap().value, "com.example.app");
    assert_eq!(
        store.get(&ReferenceKey::ImageHash(MODULE.into())).unwrap().value,
        "bb"
    );
    assert_eq!(store.get(&ReferenceKey::MainImageHash).unwrap().value, "cc");
}

#[tokio::test]
async fn tamper_preset_flags_provision_mismatch() {
    let (dir, provision, module) = bundle_dir();
    let module_hash = sha256_bytes(b"framework image").digest_hex;

    let server = MockServer::start().await;
    serve(&server, "BundleId", "com.example.app").await;
    serve(&server, "ProvisionHash", &"aa".repeat(32)).await;
    serve(&server, "MachOHash", &module_hash).await;

    let endpoints = EndpointConfig::default()
        .with_template(format!("{}/Values/{{key}}", server.uri()))
        .endpoints_for(&keys()[..3])
        .unwrap();
    let store = store();
    assert!(store.load(ReferenceSource::Remote(endpoints)).await.is_complete());

    let evaluator = TamperEvaluator::new(
        BinaryHasher::new(ProcessImageLocator::new().with_module_path(MODULE, &module)),
        BundleInfo::default()
            .with_identifier("com.example.app")
            .with_provisioning_profile(&provision),
    );

    let report = evaluator
        .evaluate_report(&CheckPreset::Tamper.checks(MODULE), &store)
        .await;

    assert!(!report.overall);
    assert_eq!(report.error, None);
    let failed: Vec<_> = report.checks.iter().filter(|c| !c.matched).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].kind, CheckKind::ProvisionFile.to_string());
    drop(dir);
}

#[tokio::test]
async fn partial_references_stop_the_evaluation() {
    let (_dir, provision, module) = bundle_dir();

    let server = MockServer::start().await;
    serve(&server, "BundleId", "com.example.app").await;

    let endpoints = EndpointConfig::default()
        .with_template(format!("{}/Values/{{key}}", server.uri()))
        .endpoints_for(&keys())
        .unwrap();
    let store = store();
    store.load(ReferenceSource::Remote(endpoints)).await;

    let evaluator = TamperEvaluator::new(
        BinaryHasher::new(ProcessImageLocator::new().with_module_path(MODULE, &module)),
        BundleInfo::default()
            .with_identifier("com.example.app")
            .with_provisioning_profile(&provision),
    );

    let report = evaluator
        .evaluate_report(&CheckPreset::Tamper.checks(MODULE), &store)
        .await;
    assert_eq!(report.error, Some(ReportError::InsufficientReferenceData));
    assert!(!report.overall);
    assert!(report.checks.is_empty());
}

#[tokio::test]
async fn undecodable_body_is_absent_for_that_key_only() {
    let server = MockServer::start().await;
    serve(&server, "BundleId", "com.example.app").await;
    serve(&server, "MachOHash", "bb").await;
    serve(&server, "MainBinaryHash", "cc").await;
    Mock::given(method("GET"))
        .and(path("/Values/ProvisionHash"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe]))
        .mount(&server)
        .await;

    let store = store();
    let summary = store
        .load(ReferenceSource::Configured {
            endpoints: EndpointConfig::default()
                .with_template(format!("{}/Values/{{key}}", server.uri())),
            keys: keys(),
        })
        .await;

    assert_eq!(summary.absent, vec![ReferenceKey::ProvisionHash]);
    assert_eq!(summary.loaded.len(), 3);
    assert!(store.get(&ReferenceKey::ProvisionHash).is_none());
}

#[tokio::test]
async fn malformed_endpoint_override_reports_insufficient_data() {
    let (_dir, provision, module) = bundle_dir();
    let module_hash = sha256_bytes(b"framework image").digest_hex;
    let provision_hash = sha256_bytes(b"provisioning profile").digest_hex;

    let server = MockServer::start().await;
    serve(&server, "ProvisionHash", &provision_hash).await;
    serve(&server, "MachOHash", &module_hash).await;

    let store = store();
    let summary = store
        .load(ReferenceSource::Configured {
            endpoints: EndpointConfig::default()
                .with_template(format!("{}/Values/{{key}}", server.uri()))
                .with_endpoint(ReferenceKey::BundleId, "not a url"),
            keys: keys()[..3].to_vec(),
        })
        .await;
    assert_eq!(summary.absent, vec![ReferenceKey::BundleId]);

    let evaluator = TamperEvaluator::new(
        BinaryHasher::new(ProcessImageLocator::new().with_module_path(MODULE, &module)),
        BundleInfo::default()
            .with_identifier("com.example.app")
            .with_provisioning_profile(&provision),
    );
    let report = evaluator
        .evaluate_report(&CheckPreset::Tamper.checks(MODULE), &store)
        .await;

    assert_eq!(report.error, Some(ReportError::InsufficientReferenceData));
    assert!(report.message.unwrap().contains("bundleId"));
}
