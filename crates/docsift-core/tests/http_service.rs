use std::path::PathBuf;
use std::time::Duration;

use docsift_core::{
    Analyzer, AnalyzerConfig, Decision, DocumentService, FeatureBucket, Fetcher,
    HttpDocumentService, ServiceError,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn sample_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("sample.bin");
    tokio::fs::write(&path, b"raw input bytes").await.unwrap();
    path
}

fn config_for(server: &MockServer) -> AnalyzerConfig {
    AnalyzerConfig {
        service_url: server.uri(),
        request_timeout_seconds: 2,
        retry_backoff_ms: 10,
        ..Default::default()
    }
}

fn unpack_mock() -> wiremock::MockBuilder {
    Mock::given(method("PUT")).and(path("/unpack/all"))
}

#[tokio::test]
async fn test_unpack_decodes_response() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {
                "Content-Type": "application/pdf",
                "dc:title": "Quarterly report"
            },
            "content": "body text",
            "attachments": {"embedded.xls": "Y2VsbHM="}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let service = HttpDocumentService::new(&config_for(&server)).unwrap();
    let document = service.unpack(&file).await.unwrap().unwrap();

    assert_eq!(document.content.as_deref(), Some("body text"));
    assert_eq!(document.metadata["dc:title"].values(), ["Quarterly report"]);
    assert_eq!(document.attachments["embedded.xls"], b"cells");
}

#[tokio::test]
async fn test_null_body_is_no_result() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let service = HttpDocumentService::new(&config_for(&server)).unwrap();
    let result = service.unpack(&file).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let service = HttpDocumentService::new(&config_for(&server)).unwrap();
    let result = service.unpack(&file).await;

    assert!(matches!(result, Err(ServiceError::Status(status)) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let service = HttpDocumentService::new(&config_for(&server)).unwrap();

    let result = service.unpack(&PathBuf::from("/no/such/file")).await;

    assert!(matches!(result, Err(ServiceError::Io(_))));
}

#[tokio::test]
async fn test_fetcher_retries_transient_failure_over_http() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    unpack_mock()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"metadata": {"Content-Type": "text/plain"}})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let config = config_for(&server);
    let service = HttpDocumentService::new(&config).unwrap();
    let fetcher = Fetcher::new(Box::new(service)).with_backoff(Duration::from_millis(10));

    let document = fetcher.fetch(&file).await.unwrap().unwrap();

    assert_eq!(
        document.metadata["Content-Type"].values(),
        ["text/plain"]
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetcher_gives_up_after_two_attempts() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let config = config_for(&server);
    let service = HttpDocumentService::new(&config).unwrap();
    let fetcher = Fetcher::new(Box::new(service)).with_backoff(Duration::from_millis(10));

    let result = fetcher.fetch(&file).await;

    assert!(matches!(result, Err(ServiceError::Status(_))));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_timeout_is_fatal_without_retry() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let config = AnalyzerConfig {
        request_timeout_seconds: 1,
        ..config_for(&server)
    };
    let service = HttpDocumentService::new(&config).unwrap();
    let fetcher = Fetcher::new(Box::new(service)).with_backoff(Duration::from_millis(10));

    let result = fetcher.fetch(&file).await;

    assert!(matches!(result, Err(ServiceError::Timeout(_))));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_analyzer_abstains_on_persistent_empty_body() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let analyzer = Analyzer::new(config_for(&server)).unwrap();
    let report = analyzer.analyze_file(&file).await.unwrap();

    assert_eq!(report.analysis.decision, Decision::Abstain);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_analyzer_end_to_end_over_http() {
    let server = MockServer::start().await;
    unpack_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {
                "Content-Type": "application/zip",
                "X-TIKA:Parsed-By": "org.apache.tika.parser.pkg.PackageParser",
                "Custom": "bar"
            },
            "content": "hello",
            "attachments": {"sample.bin_0": "AA==", "notes.txt": "AQ=="}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let file = sample_file(&dir).await;

    let analyzer = Analyzer::new(config_for(&server)).unwrap();
    let report = analyzer.analyze_file(&file).await.unwrap();

    assert_eq!(report.analysis.decision, Decision::Proceed);
    assert_eq!(
        report.analysis.features.get(FeatureBucket::Mime)[0].value,
        "application/zip"
    );
    assert_eq!(
        report.analysis.features.get(FeatureBucket::FileMetadata)[0]
            .label
            .as_deref(),
        Some("Custom")
    );
    assert!(report
        .analysis
        .features
        .get(FeatureBucket::DroppedMetadata)
        .is_empty());
    assert_eq!(report.analysis.text.as_deref(), Some("hello"));

    // The attachment that reuses the input's base name gets no filename
    // feature; the other one does.
    assert_eq!(report.analysis.children.len(), 2);
    let reused = report
        .analysis
        .children
        .iter()
        .find(|c| c.name == "sample.bin_0")
        .unwrap();
    let distinct = report
        .analysis
        .children
        .iter()
        .find(|c| c.name == "notes.txt")
        .unwrap();
    assert_eq!(reused.filename(), None);
    assert_eq!(distinct.filename(), Some("notes.txt"));
}
