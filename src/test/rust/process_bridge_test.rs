#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tempfile::TempDir;

use media_bridge::{
    DomainError, MetadataResolver, PrometheusReporter, StreamBridgeService, TokioProcessSpawner,
};

const SAMPLE_INFO: &str = include_str!("../resources/sample_info.json");

// Writing an executable while another test thread forks can fail with ETXTBSY
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable shell script standing in for the extraction tool
fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("yt-dlp");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}

fn services(program: &Path) -> (MetadataResolver, StreamBridgeService) {
    let spawner = Arc::new(TokioProcessSpawner::new(program));
    let metrics = Arc::new(PrometheusReporter::new());
    (
        MetadataResolver::new(spawner.clone(), metrics.clone()),
        StreamBridgeService::new(spawner, metrics),
    )
}

/// Alive means present in the process table and not a zombie
fn is_alive(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .map(|state| state != "Z" && state != "X")
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[tokio::test]
async fn test_resolver_runs_tool_and_filters_formats() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("info.json"), SAMPLE_INFO).unwrap();
    let program = fake_tool(
        &dir,
        &format!(
            "printf '%s\\n' \"$@\" > '{0}/args.txt'\ncat '{0}/info.json'",
            dir.path().display()
        ),
    );
    let (resolver, _) = services(&program);

    let descriptor = resolver
        .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap();

    assert_eq!(descriptor.id, "dQw4w9WgXcQ");
    let ids: Vec<&str> = descriptor
        .encodings
        .iter()
        .map(|e| e.encoding_id.as_str())
        .collect();
    assert_eq!(ids, vec!["18", "248", "22", "313"]);

    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert!(args.lines().any(|a| a == "--dump-single-json"));
    assert_eq!(
        args.lines().last(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
}

#[tokio::test]
async fn test_resolver_reports_tool_error_line() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let program = fake_tool(
        &dir,
        "echo 'ERROR: Unsupported URL: https://example.com/' >&2\nexit 1",
    );
    let (resolver, _) = services(&program);

    let err = resolver.resolve("https://example.com/").await.unwrap_err();

    match err {
        DomainError::ExtractionFailed(message) => {
            assert!(message.contains("Unsupported URL"), "got: {}", message)
        }
        other => panic!("expected ExtractionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolver_missing_tool_is_extraction_failure() {
    let (resolver, _) = services(Path::new("/nonexistent/yt-dlp"));

    let err = resolver.resolve("https://example.com/v").await.unwrap_err();

    assert!(matches!(err, DomainError::ExtractionFailed(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_download_missing_tool_fails_to_start() {
    let (_, bridge) = services(Path::new("/nonexistent/yt-dlp"));

    let err = bridge
        .open_download_stream("https://example.com/v", "22")
        .err()
        .unwrap();

    assert!(matches!(err, DomainError::StreamStartFailed(_)));
}

#[tokio::test]
async fn test_download_relays_stdout_until_clean_exit() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let program = fake_tool(&dir, "printf 'abc'\nprintf 'def'\necho 'progress' >&2");
    let (_, bridge) = services(&program);

    let mut stream = bridge
        .open_download_stream("https://example.com/v", "22")
        .unwrap();

    let mut received = Vec::new();
    while let Some(item) = stream.next_chunk().await {
        received.extend_from_slice(&item.unwrap());
    }

    assert_eq!(received, b"abcdef");
    assert!(stream.next_chunk().await.is_none());
}

#[tokio::test]
async fn test_download_crash_after_first_bytes_aborts_stream() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let program = fake_tool(
        &dir,
        "printf 'partial'\necho 'ERROR: fragment 3 not found' >&2\nexit 3",
    );
    let (_, bridge) = services(&program);

    let mut stream = bridge
        .open_download_stream("https://example.com/v", "22")
        .unwrap();

    let mut received = Vec::new();
    let mut failure = None;
    while let Some(item) = stream.next_chunk().await {
        match item {
            Ok(chunk) => received.extend_from_slice(&chunk),
            Err(e) => failure = Some(e),
        }
    }

    assert_eq!(received, b"partial");
    match failure {
        Some(DomainError::StreamAborted(message)) => {
            assert!(message.contains("fragment 3 not found"), "got: {}", message)
        }
        other => panic!("expected StreamAborted, got {:?}", other),
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_dropping_stream_terminates_process() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let program = fake_tool(&dir, "printf 'first'\nexec sleep 30");
    let (_, bridge) = services(&program);

    let mut stream = bridge
        .open_download_stream("https://example.com/v", "22")
        .unwrap();
    let pid = stream.process_id().unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), stream.next_chunk())
        .await
        .unwrap();
    assert!(matches!(first, Some(Ok(_))));
    assert!(is_alive(pid));

    drop(stream);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while is_alive(pid) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!is_alive(pid), "process {} outlived its stream", pid);
}

/// Runs against the real tool when both it and a URL are available
#[tokio::test]
async fn test_smoke_against_installed_tool() {
    let Ok(url) = std::env::var("MEDIA_BRIDGE_SMOKE_URL") else {
        eprintln!("MEDIA_BRIDGE_SMOKE_URL not set, skipping");
        return;
    };
    if std::process::Command::new("yt-dlp")
        .arg("--version")
        .output()
        .is_err()
    {
        eprintln!("yt-dlp not installed, skipping");
        return;
    }

    let (resolver, bridge) = services(Path::new("yt-dlp"));

    let descriptor = resolver.resolve(&url).await.unwrap();
    assert!(!descriptor.encodings.is_empty());

    let encoding = &descriptor.encodings[0];
    let mut stream = bridge
        .open_download_stream(&url, &encoding.encoding_id)
        .unwrap();
    let first = tokio::time::timeout(Duration::from_secs(60), stream.next_chunk())
        .await
        .unwrap();
    assert!(matches!(first, Some(Ok(chunk)) if !chunk.is_empty()));
}
