//! Rate-limited warnings emitted when remote delivery fails.
//!
//! `logtest` installs a process-wide logger, so these tests run serially
//! and drain the capture queue before asserting.

use std::sync::Arc;
use std::time::Duration;

use femtologging_discord::{
    DiscordHandlerBuilder, FemtoHandlerTrait, FemtoLevel, FemtoLogRecord, HandlerBuilderTrait,
    test_utils::RecordingClient,
};
use logtest::Logger;
use serial_test::serial;

const URL: &str = "https://discord.com/api/webhooks/1/tok";

/// `Logger::start` may only install the global logger once per process.
fn start_logger() -> Logger {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        Logger::start();
    });
    Logger
}

fn drain_warnings(logger: &mut Logger) -> Vec<String> {
    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn {
            warnings.push(record.args().to_owned());
        }
    }
    warnings
}

#[test]
#[serial]
fn failed_deliveries_warn_once_per_interval() {
    let mut logger = start_logger();
    drain_warnings(&mut logger);

    let client = RecordingClient::failing();
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_sync_mode(true)
        .with_warn_interval(Duration::from_secs(60))
        .build_inner()
        .expect("build");

    for _ in 0..3 {
        handler
            .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "lost"))
            .expect("failures are swallowed");
    }

    assert_eq!(client.messages().len(), 3);
    let warnings = drain_warnings(&mut logger);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("failed to deliver 1 messages"), "{}", warnings[0]);
}

#[test]
#[serial]
fn full_queue_drops_with_warning() {
    let mut logger = start_logger();
    drain_warnings(&mut logger);

    let client = RecordingClient::new().with_delay(Duration::from_millis(200));
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_workers(1)
        .with_capacity(1)
        .build_inner()
        .expect("build");

    for _ in 0..10 {
        handler
            .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "burst"))
            .expect("drops are swallowed");
    }
    assert!(handler.flush_timeout(Duration::from_secs(5)));
    assert!(client.messages().len() < 10);

    let warnings = drain_warnings(&mut logger);
    assert!(
        warnings.iter().any(|w| w.contains("queue full")),
        "{warnings:?}"
    );
}
