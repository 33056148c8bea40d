use std::collections::HashSet;
use std::fs;
use std::io::{Read, Write};
use std::net::Shutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use threadgrab_core::{AttachmentDescriptor, BatchSummary, DownloadOutcome};
use threadgrab_engine::{
    Downloader, FetchError, FetchMetadata, FetchOutput, FetchSettings, Fetcher, OutcomeSink,
    ReqwestFetcher,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Default)]
struct TestSink {
    outcomes: Arc<Mutex<Vec<DownloadOutcome>>>,
}

impl TestSink {
    fn take(&self) -> Vec<DownloadOutcome> {
        self.outcomes.lock().unwrap().drain(..).collect()
    }
}

impl OutcomeSink for TestSink {
    fn report(&self, outcome: &DownloadOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}

fn descriptor(file_name: &str, source_url: String) -> AttachmentDescriptor {
    AttachmentDescriptor {
        file_name: file_name.to_string(),
        source_url,
    }
}

fn reqwest_downloader(max_concurrent: Option<usize>) -> Downloader {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    Downloader::new(Arc::new(fetcher), max_concurrent)
}

async fn mount_file(server: &MockServer, route: &str, body: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn one_failing_download_does_not_block_siblings() {
    init_logging();
    let server = MockServer::start().await;
    mount_file(&server, "/g/src/1.jpg", b"one").await;
    mount_file(&server, "/g/src/2.png", b"two").await;
    mount_file(&server, "/g/src/4.webm", b"four").await;

    let refused = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let descriptors = vec![
        descriptor("1.jpg", format!("{}/g/src/1.jpg", server.uri())),
        descriptor("2.png", format!("{}/g/src/2.png", server.uri())),
        descriptor("3.gif", format!("http://{refused}/g/src/3.gif")),
        descriptor("4.webm", format!("{}/g/src/4.webm", server.uri())),
    ];

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("g").join("No. 1");
    let sink = TestSink::default();

    let summary = reqwest_downloader(None)
        .download_all(&dir, descriptors, &sink)
        .await
        .unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            total: 4,
            succeeded: 3,
            failed: 1
        }
    );

    let outcomes = sink.take();
    assert_eq!(outcomes.len(), 4);
    let names: HashSet<_> = outcomes.iter().map(|o| o.file_name.as_str()).collect();
    assert_eq!(names, HashSet::from(["1.jpg", "2.png", "3.gif", "4.webm"]));

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].file_name, "3.gif");
    assert!(failed[0].to_string().starts_with("3.gif: network error"));

    assert_eq!(fs::read(dir.join("1.jpg")).unwrap(), b"one");
    assert_eq!(fs::read(dir.join("2.png")).unwrap(), b"two");
    assert_eq!(fs::read(dir.join("4.webm")).unwrap(), b"four");
    assert!(!dir.join("3.gif").exists());
}

#[tokio::test]
async fn http_error_status_is_a_failure_outcome() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/g/src/9.jpg"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();
    let summary = reqwest_downloader(None)
        .download_all(
            temp.path(),
            vec![descriptor("9.jpg", format!("{}/g/src/9.jpg", server.uri()))],
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    let outcomes = sink.take();
    assert_eq!(
        outcomes[0].result,
        Err("http status 404: Not Found".to_string())
    );
    assert!(!temp.path().join("9.jpg").exists());
}

#[tokio::test]
async fn truncated_body_is_a_failure_and_leaves_no_file() {
    init_logging();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
            .unwrap();
        let _ = stream.shutdown(Shutdown::Write);
    });

    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();
    let summary = reqwest_downloader(None)
        .download_all(
            temp.path(),
            vec![descriptor("1.jpg", format!("http://{addr}/g/src/1.jpg"))],
            &sink,
        )
        .await
        .unwrap();
    server.join().unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            total: 1,
            succeeded: 0,
            failed: 1
        }
    );
    let outcomes = sink.take();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].file_name, "1.jpg");
    assert!(!outcomes[0].is_success());
    assert!(!temp.path().join("1.jpg").exists());
}

#[tokio::test]
async fn empty_batch_completes_immediately_and_creates_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a").join("No. 5");
    let sink = TestSink::default();

    let summary = reqwest_downloader(None)
        .download_all(&dir, Vec::new(), &sink)
        .await
        .unwrap();

    assert_eq!(summary, BatchSummary::default());
    assert!(sink.take().is_empty());
    assert!(dir.is_dir());
}

#[tokio::test]
async fn outcomes_arrive_in_completion_order() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/g/src/slow.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_bytes(b"slow".as_slice()),
        )
        .mount(&server)
        .await;
    mount_file(&server, "/g/src/fast.jpg", b"fast").await;

    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();
    reqwest_downloader(None)
        .download_all(
            temp.path(),
            vec![
                descriptor("slow.jpg", format!("{}/g/src/slow.jpg", server.uri())),
                descriptor("fast.jpg", format!("{}/g/src/fast.jpg", server.uri())),
            ],
            &sink,
        )
        .await
        .unwrap();

    let order: Vec<_> = sink.take().into_iter().map(|o| o.file_name).collect();
    assert_eq!(order, vec!["fast.jpg", "slow.jpg"]);
}

#[tokio::test]
async fn running_twice_overwrites_the_same_files() {
    let server = MockServer::start().await;
    mount_file(&server, "/g/src/1.jpg", b"same bytes").await;
    let temp = TempDir::new().unwrap();

    for _ in 0..2 {
        let sink = TestSink::default();
        let summary = reqwest_downloader(None)
            .download_all(
                temp.path(),
                vec![descriptor("1.jpg", format!("{}/g/src/1.jpg", server.uri()))],
                &sink,
            )
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 1);
    }

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["1.jpg"]);
    assert_eq!(fs::read(temp.path().join("1.jpg")).unwrap(), b"same bytes");
}

#[tokio::test]
async fn unusable_output_dir_is_a_setup_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("g");
    fs::write(&blocker, "file").unwrap();

    let sink = TestSink::default();
    let result = reqwest_downloader(None)
        .download_all(
            &blocker.join("No. 1"),
            vec![descriptor("1.jpg", "http://127.0.0.1:1/1.jpg".to_string())],
            &sink,
        )
        .await;

    assert!(result.is_err());
    assert!(sink.take().is_empty());
}

/// Serves fixed bytes after a short sleep and tracks how many requests overlap.
#[derive(Default)]
struct CountingFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait::async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url.ends_with("panic") {
            panic!("fetcher blew up on {url}");
        }

        let bytes = url.as_bytes().to_vec();
        Ok(FetchOutput {
            metadata: FetchMetadata {
                final_url: url.to_string(),
                content_type: None,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

#[tokio::test]
async fn concurrency_limit_caps_overlapping_requests() {
    let fetcher = Arc::new(CountingFetcher::default());
    let downloader = Downloader::new(fetcher.clone(), Some(2));
    let descriptors = (0..6)
        .map(|i| descriptor(&format!("{i}.jpg"), format!("mem://{i}")))
        .collect();

    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();
    let summary = downloader
        .download_all(temp.path(), descriptors, &sink)
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 6);
    assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(fs::read(temp.path().join("3.jpg")).unwrap(), b"mem://3");
}

#[tokio::test]
async fn unbounded_downloader_starts_everything_at_once() {
    let fetcher = Arc::new(CountingFetcher::default());
    let downloader = Downloader::new(fetcher.clone(), Some(0));
    let descriptors = (0..5)
        .map(|i| descriptor(&format!("{i}.png"), format!("mem://{i}")))
        .collect();

    let temp = TempDir::new().unwrap();
    let summary = downloader
        .download_all(temp.path(), descriptors, &TestSink::default())
        .await
        .unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(fetcher.peak.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn panicking_task_still_produces_one_outcome() {
    let downloader = Downloader::new(Arc::new(CountingFetcher::default()), None);
    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();

    let summary = downloader
        .download_all(
            temp.path(),
            vec![
                descriptor("ok.jpg", "mem://ok".to_string()),
                descriptor("boom.jpg", "mem://panic".to_string()),
            ],
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 1);
    let boom = sink
        .take()
        .into_iter()
        .find(|o| o.file_name == "boom.jpg")
        .unwrap();
    assert!(boom.to_string().contains("download task failed"));
}

#[tokio::test]
async fn write_failure_is_reported_per_file() {
    let downloader = Downloader::new(Arc::new(CountingFetcher::default()), None);
    let temp = TempDir::new().unwrap();
    let sink = TestSink::default();

    let summary = downloader
        .download_all(
            temp.path(),
            vec![
                descriptor("good.jpg", "mem://good".to_string()),
                descriptor("../bad.jpg", "mem://bad".to_string()),
            ],
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(temp.path().join("good.jpg").exists());
}
