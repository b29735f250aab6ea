//! End-to-end behaviour of `FemtoDiscordHandler` against test doubles.

use std::sync::Arc;
use std::time::Duration;

use femtologging_discord::{
    Attr, DiscordHandlerBuilder, FemtoDiscordHandler, FemtoHandlerTrait, FemtoLevel,
    FemtoLogRecord, FemtoLogger, FemtoStreamHandler, HandlerBuildError, HandlerBuilderTrait,
    HandlerOption, SharedFormatter,
    test_utils::{CollectingHandler, RecordingClient},
};
use rstest::{fixture, rstest};

mod test_utils;
use test_utils::SharedBuf;

const URL: &str = "https://discord.com/api/webhooks/1100/token";

#[fixture]
fn client() -> RecordingClient {
    RecordingClient::new()
}

fn warn_sync(client: &RecordingClient) -> FemtoDiscordHandler {
    FemtoDiscordHandler::new(
        URL,
        [
            HandlerOption::Client(Arc::new(client.clone())),
            HandlerOption::MinLevel(FemtoLevel::Warn),
            HandlerOption::SyncMode(true),
        ],
    )
    .expect("valid configuration")
}

#[rstest]
fn info_below_warn_is_not_delivered(client: RecordingClient) {
    let handler = warn_sync(&client);
    assert!(!handler.enabled(FemtoLevel::Info));
    handler
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Info, "routine"))
        .expect("no error");
    assert!(client.messages().is_empty());
}

#[rstest]
fn error_is_delivered_before_handle_returns(client: RecordingClient) {
    let handler = warn_sync(&client);
    handler
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "failed").with_attr("error", "boom"))
        .expect("no error");

    let embeds = client.embeds();
    assert_eq!(embeds.len(), 1);
    let embed = &embeds[0];
    assert_eq!(embed.title.as_deref(), Some("ERROR"));
    assert_eq!(embed.description.as_deref(), Some("failed"));
    assert_eq!(embed.color, Some(0xFF0000));
    assert_eq!(embed.fields.len(), 1);
    assert_eq!(embed.fields[0].name, "error");
    assert_eq!(embed.fields[0].value, "boom");
    assert!(!embed.fields[0].inline);
}

#[rstest]
fn empty_url_is_a_configuration_error() {
    let err = FemtoDiscordHandler::new("", []).expect_err("empty URL");
    assert!(matches!(err, HandlerBuildError::InvalidConfig(_)));
}

#[rstest]
fn malformed_url_fails_client_init() {
    let err = FemtoDiscordHandler::new("https://discord.com/not-a-webhook", [])
        .expect_err("no credentials");
    assert!(matches!(err, HandlerBuildError::ClientInit(_)));
}

#[rstest]
fn later_options_override_earlier(client: RecordingClient) {
    let handler = FemtoDiscordHandler::new(
        URL,
        [
            HandlerOption::MinLevel(FemtoLevel::Error),
            HandlerOption::SyncMode(false),
            HandlerOption::Client(Arc::new(client.clone())),
            HandlerOption::MinLevel(FemtoLevel::Debug),
            HandlerOption::SyncMode(true),
        ],
    )
    .expect("build");
    assert_eq!(handler.min_level(), FemtoLevel::Debug);
    assert!(handler.is_sync());
}

#[rstest]
fn nested_groups_flatten_to_dotted_keys(client: RecordingClient) {
    let handler = warn_sync(&client).with_group("req");
    let record = FemtoLogRecord::new("svc", FemtoLevel::Error, "bad request").with_attrs([
        Attr::group(
            "request",
            vec![Attr::new("user_id", "u-1"), Attr::new("payload", "{}")],
        ),
    ]);
    handler.handle(&record).expect("no error");

    let fields = &client.embeds()[0].fields;
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["req.request.user_id", "req.request.payload"]);
}

#[rstest]
fn empty_values_produce_no_fields(client: RecordingClient) {
    let handler = warn_sync(&client);
    let record = FemtoLogRecord::new("svc", FemtoLevel::Error, "sparse").with_attrs([
        Attr::new("blank", ""),
        Attr::group("hollow", vec![Attr::new("inner", "")]),
        Attr::new("kept", "yes"),
    ]);
    handler.handle(&record).expect("no error");

    let fields = &client.embeds()[0].fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "kept");
}

#[rstest]
fn chaining_never_mutates_the_receiver(client: RecordingClient) {
    let root = warn_sync(&client);
    let _with_attrs = root.with_attrs(&[Attr::new("env", "prod")]);
    let _with_group = root.with_group("req");

    root.handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "plain").with_attr("id", 1_i64))
        .expect("no error");

    let fields = &client.embeds()[0].fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "id");
}

#[rstest]
fn secondary_handler_sees_every_record_with_same_context(client: RecordingClient) {
    let secondary = CollectingHandler::new();
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_sync_mode(true)
        .with_min_level(FemtoLevel::Error)
        .with_handler(Arc::new(secondary.clone()))
        .build_inner()
        .expect("build");

    let scoped = handler
        .with_attrs(&[Attr::new("env", "local")])
        .with_group("request");
    scoped
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Info, "routine").with_attr("id", 1_i64))
        .expect("no error");
    scoped
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "broken").with_attr("id", 2_i64))
        .expect("no error");

    assert_eq!(client.messages().len(), 1);
    let seen = secondary.collected_attrs();
    assert_eq!(seen.len(), 2);
    for attrs in &seen {
        let keys: Vec<_> = attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["env", "request.id"]);
    }
}

#[rstest]
fn delivery_failure_still_reaches_secondary() {
    let failing = RecordingClient::failing();
    let secondary = CollectingHandler::new();
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(failing.clone()))
        .with_sync_mode(true)
        .with_handler(Arc::new(secondary.clone()))
        .build_inner()
        .expect("build");

    handler
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "lost"))
        .expect("remote failures are swallowed");
    assert_eq!(failing.messages().len(), 1);
    assert_eq!(secondary.collected()[0].message, "lost");
}

#[rstest]
fn async_mode_delivers_eventually_and_flush_waits(client: RecordingClient) {
    let slow = client.with_delay(Duration::from_millis(30));
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(slow.clone()))
        .with_workers(2)
        .build()
        .expect("build");

    for i in 0..4_i64 {
        handler
            .handle(&FemtoLogRecord::new("svc", FemtoLevel::Warn, "async").with_attr("n", i))
            .expect("no error");
    }
    assert!(handler.flush());
    assert_eq!(slow.messages().len(), 4);

    let mut ns: Vec<_> = slow
        .embeds()
        .iter()
        .map(|e| e.fields[0].value.clone())
        .collect();
    ns.sort();
    assert_eq!(ns, ["0", "1", "2", "3"]);
}

#[rstest]
fn async_burst_larger_than_worker_pool_is_not_dropped(client: RecordingClient) {
    let slow = client.with_delay(Duration::from_millis(1));
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(slow.clone()))
        .with_workers(1)
        .build_inner()
        .expect("build");

    for i in 0..1_500_i64 {
        handler
            .handle(&FemtoLogRecord::new("svc", FemtoLevel::Error, "burst").with_attr("n", i))
            .expect("no error");
    }
    assert!(handler.flush_timeout(Duration::from_secs(30)));
    assert_eq!(slow.messages().len(), 1_500);
}

#[rstest]
fn logger_over_handler_with_stream_secondary(client: RecordingClient) {
    let buf = SharedBuf::new();
    let stream = FemtoStreamHandler::new(buf.clone(), SharedFormatter::default());
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_sync_mode(true)
        .with_min_level(FemtoLevel::Error)
        .with_handler(Arc::new(stream))
        .build()
        .expect("build");
    let logger = FemtoLogger::new("svc", handler).with("env", "local");

    logger.info("started", []);
    logger.error("crashed", [Attr::new("error", "boom")]);

    let lines = buf.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("[INFO] svc: started env=local"), "{}", lines[0]);
    assert!(lines[1].ends_with("[ERROR] svc: crashed env=local error=boom"), "{}", lines[1]);

    let embeds = client.embeds();
    assert_eq!(embeds.len(), 1);
    let names: Vec<_> = embeds[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["env", "error"]);
}
