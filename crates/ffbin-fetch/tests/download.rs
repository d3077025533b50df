use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use ffbin_fetch::mock::{MockHttpClient, MockRoute};
use ffbin_fetch::{DownloadOptions, DownloadProgress, FetchError, Source, download_archive};

const ARCHIVE: &str = "ffmpeg-master-latest-linux64-gpl.tar.xz";

fn leftover_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn streams_body_into_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let body: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let client = MockHttpClient::new().route(
        source.archive_url(ARCHIVE),
        MockRoute::Respond {
            status: 200,
            content_length: Some(body.len() as u64),
            chunks: body.chunks(1000).map(Bytes::copy_from_slice).collect(),
        },
    );

    let updates: Arc<Mutex<Vec<DownloadProgress>>> = Arc::default();
    let sink = updates.clone();
    let options = DownloadOptions::default().on_progress(Arc::new(move |p| {
        sink.lock().unwrap().push(p.clone());
    }));

    let staged = download_archive(&client, &source, ARCHIVE, dir.path(), &options)
        .await
        .unwrap();

    assert_eq!(std::fs::read(staged.path()).unwrap(), body);
    assert_eq!(staged.bytes(), body.len() as u64);
    let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("temp-") && name.ends_with(".tar.xz"), "{name}");

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 10);
    assert!(updates.windows(2).all(|w| w[0].downloaded < w[1].downloaded));
    let last = updates.last().unwrap();
    assert_eq!(last.downloaded, last.total);
    assert_eq!(last.percentage(), Some(100.0));
}

#[tokio::test]
async fn unknown_length_downloads_without_progress() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let client = MockHttpClient::new().chunked(source.archive_url(ARCHIVE), &[7u8; 300], 64);

    let calls = Arc::new(Mutex::new(0usize));
    let counter = calls.clone();
    let options = DownloadOptions::default().on_progress(Arc::new(move |_| {
        *counter.lock().unwrap() += 1;
    }));

    let staged = download_archive(&client, &source, ARCHIVE, dir.path(), &options)
        .await
        .unwrap();
    assert_eq!(staged.bytes(), 300);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn error_status_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::proxy("ghfast", "https://ghfast.top/");
    let client = MockHttpClient::new().status(source.archive_url(ARCHIVE), 404);

    let err = download_archive(&client, &source, ARCHIVE, dir.path(), &DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn broken_body_removes_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let client = MockHttpClient::new().route(
        source.archive_url(ARCHIVE),
        MockRoute::BrokenBody {
            chunks: vec![Bytes::from_static(b"partial")],
            message: "connection reset".into(),
        },
    );

    let err = download_archive(&client, &source, ARCHIVE, dir.path(), &DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network(ref m) if m.contains("reset")));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn empty_body_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let client = MockHttpClient::new().ok(source.archive_url(ARCHIVE), Bytes::new());

    let err = download_archive(&client, &source, ARCHIVE, dir.path(), &DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MissingBody { .. }));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_body_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let client = MockHttpClient::new().route(
        source.archive_url(ARCHIVE),
        MockRoute::Stall {
            chunks: vec![Bytes::from_static(b"first")],
        },
    );
    let options = DownloadOptions::default().stall_timeout(Duration::from_secs(5));

    let err = download_archive(&client, &source, ARCHIVE, dir.path(), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Stalled { idle, .. } if idle == Duration::from_secs(5)));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn explicit_remove_deletes_archive() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::direct();
    let client = MockHttpClient::new().ok(source.archive_url(ARCHIVE), vec![1u8; 16]);

    let staged = download_archive(&client, &source, ARCHIVE, dir.path(), &DownloadOptions::default())
        .await
        .unwrap();
    let path = staged.path().to_path_buf();
    assert!(path.exists());

    staged.remove().await.unwrap();
    assert!(!path.exists());
}
