//! Replace the default embed layout with a closure.

use std::{env, error::Error, sync::Arc};

use femtologging_discord::{
    Attr, DiscordHandlerBuilder, Embed, EmbedBuilder, FemtoLevel, FemtoLogRecord, FemtoLogger,
    FlatAttr, HandlerBuilderTrait, SharedMessageBuilder,
};

fn build_embed(record: &FemtoLogRecord, attrs: &[FlatAttr], draft: &mut EmbedBuilder) -> Embed {
    draft
        .set_title(format!("Custom Title - Level {}", record.level))
        .set_description(format!("Custom Description\nMsg: {}", record.message()))
        .set_timestamp(record.timestamp());
    if record.level == FemtoLevel::Error {
        // Overrides the colour picked from the colour map.
        draft.set_color(0xE30B5C);
    }
    for attr in attrs {
        draft.add_field(attr.key.as_str(), attr.value.to_text(), true);
    }
    draft.build()
}

fn main() -> Result<(), Box<dyn Error>> {
    let url = env::var("DISCORD_WEBHOOK_URL")?;
    let handler = DiscordHandlerBuilder::new()
        .with_url(url)
        .with_sync_mode(true)
        .with_username("femtologging")
        .with_message_builder(SharedMessageBuilder::new(build_embed))
        .build()?;

    let logger = FemtoLogger::new("demo", Arc::clone(&handler))
        .with("env", "local")
        .with_group("request");
    logger.error(
        "incoming request",
        [
            Attr::new("payload", "some payload"),
            Attr::new("user_id", "some_user_id"),
        ],
    );
    Ok(())
}
