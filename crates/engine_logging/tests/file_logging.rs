use engine_logging::{engine_debug, engine_info, initialize, LogDestination};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn file_destination_writes_messages_at_or_above_level() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("run.log");

    initialize(LogDestination::File(log_path.clone()), LevelFilter::Info);
    engine_info!("resolved thread board={} no={}", "g", 123456);
    engine_debug!("filtered out at info level");

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("resolved thread board=g no=123456"));
    assert!(!contents.contains("filtered out"));

    // Second initialization is a no-op rather than a panic.
    initialize(LogDestination::Terminal, LevelFilter::Debug);
}
