//! Unit tests for handler state, filtering and chaining.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::{
    attr::Attr,
    color::ColorMap,
    embed::{EmbedBuilder, SharedMessageBuilder},
    flatten::FlatAttr,
    handler::FemtoHandlerTrait,
    handlers::{DiscordHandlerBuilder, HandlerBuilderTrait},
    level::FemtoLevel,
    log_record::FemtoLogRecord,
    test_utils::{CollectingHandler, RecordingClient},
};

const URL: &str = "https://discord.com/api/webhooks/1/tok";

#[fixture]
fn client() -> RecordingClient {
    RecordingClient::new()
}

fn sync_handler(client: &RecordingClient, min_level: FemtoLevel) -> FemtoDiscordHandler {
    DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_sync_mode(true)
        .with_min_level(min_level)
        .build_inner()
        .expect("build")
}

#[rstest]
fn defaults_match_documented_values(client: RecordingClient) {
    let handler = FemtoDiscordHandler::new(URL, [HandlerOption::Client(Arc::new(client))])
        .expect("build");
    let config = handler.config();
    assert_eq!(config.min_level, DEFAULT_MIN_LEVEL);
    assert!(!config.sync_mode);
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    assert_eq!(config.workers, DEFAULT_WORKERS);
    assert_eq!(config.capacity, None);
    assert!(!handler.is_sync());
    assert!(handler.secondary().is_none());
}

#[rstest]
#[case(FemtoLevel::Debug, false)]
#[case(FemtoLevel::Info, false)]
#[case(FemtoLevel::Warn, true)]
#[case(FemtoLevel::Critical, true)]
fn enabled_follows_min_level(client: RecordingClient, #[case] level: FemtoLevel, #[case] expected: bool) {
    assert_eq!(sync_handler(&client, FemtoLevel::Warn).enabled(level), expected);
}

#[rstest]
fn secondary_handler_widens_enabled(client: RecordingClient) {
    let secondary = CollectingHandler::with_min_level(FemtoLevel::Debug);
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client.clone()))
        .with_sync_mode(true)
        .with_min_level(FemtoLevel::Error)
        .with_handler(Arc::new(secondary.clone()))
        .build_inner()
        .expect("build");

    assert!(handler.enabled(FemtoLevel::Debug));
    assert!(!handler.enabled(FemtoLevel::Trace));

    handler
        .handle(&FemtoLogRecord::new("svc", FemtoLevel::Debug, "local only"))
        .expect("secondary accepts");
    assert!(client.messages().is_empty());
    assert_eq!(secondary.collected().len(), 1);
}

#[rstest]
fn with_attrs_allocates_fresh_state(client: RecordingClient) {
    let root = sync_handler(&client, FemtoLevel::Trace);
    let child = root.with_attrs(&[Attr::new("env", "prod")]);
    assert!(root.attrs().is_empty());
    assert_eq!(child.attrs(), &[Attr::new("env", "prod")]);

    let grandchild = child.with_attrs(&[Attr::new("region", "eu")]);
    assert_eq!(child.attrs().len(), 1);
    assert_eq!(grandchild.attrs().len(), 2);
    assert!(!std::ptr::eq(child.attrs().as_ptr(), grandchild.attrs().as_ptr()));
}

#[rstest]
fn empty_group_is_a_no_op(client: RecordingClient) {
    let root = sync_handler(&client, FemtoLevel::Trace);
    let same = root.with_group("");
    assert!(same.groups().is_empty());
    let nested = root.with_group("req").with_group("db");
    assert_eq!(nested.groups(), &["req".to_owned(), "db".to_owned()]);
    assert!(root.groups().is_empty());
}

#[rstest]
fn attrs_after_group_nest_under_it(client: RecordingClient) {
    let handler = sync_handler(&client, FemtoLevel::Trace)
        .with_attrs(&[Attr::new("env", "local")])
        .with_group("request");
    let record = FemtoLogRecord::new("svc", FemtoLevel::Error, "incoming request")
        .with_attr("payload", "some payload")
        .with_attr("user_id", "some_user_id");

    let embed = &handler.render(&record).embeds[0];
    let names: Vec<_> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["env", "request.payload", "request.user_id"]);
}

#[rstest]
fn custom_color_map_and_builder(client: RecordingClient) {
    let builder = SharedMessageBuilder::from_fn(
        |record: &FemtoLogRecord, attrs: &[FlatAttr], draft: &mut EmbedBuilder| {
            draft.set_title(format!("Custom - {}", record.level_str()));
            if record.level == FemtoLevel::Error {
                draft.set_color(0xE30B5C);
            }
            for attr in attrs {
                draft.add_field(attr.key.as_str(), attr.value.to_text(), true);
            }
            draft.build()
        },
    );
    let handler = DiscordHandlerBuilder::new()
        .with_url(URL)
        .with_client(Arc::new(client))
        .with_sync_mode(true)
        .with_color_map(ColorMap::new().with(FemtoLevel::Info, 0xA020F0))
        .with_message_builder(builder)
        .build_inner()
        .expect("build");

    let info = handler.render(&FemtoLogRecord::new("svc", FemtoLevel::Info, "hi"));
    assert_eq!(info.embeds[0].color, Some(0xA020F0));
    assert_eq!(info.embeds[0].title.as_deref(), Some("Custom - INFO"));

    let warn = handler.render(&FemtoLogRecord::new("svc", FemtoLevel::Warn, "hm"));
    assert_eq!(warn.embeds[0].color, Some(0));

    let error = handler.render(&FemtoLogRecord::new("svc", FemtoLevel::Error, "no").with_attr("k", 1_i64));
    assert_eq!(error.embeds[0].color, Some(0xE30B5C));
    assert!(error.embeds[0].fields[0].inline);
}

#[rstest]
fn flush_is_trivially_true_in_sync_mode(client: RecordingClient) {
    let handler = sync_handler(&client, FemtoLevel::Trace);
    assert!(handler.flush_timeout(Duration::ZERO));
    assert!(FemtoHandlerTrait::flush(&handler));
}

#[rstest]
fn debug_output_is_compact(client: RecordingClient) {
    let handler = sync_handler(&client, FemtoLevel::Warn).with_group("req");
    let rendered = format!("{handler:?}");
    assert!(rendered.contains("min_level: Warn"));
    assert!(rendered.contains("sync_mode: true"));
    assert!(rendered.contains("\"req\""));
}
