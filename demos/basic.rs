//! Send WARN and above to Discord and everything WARN and above to stdout.
//!
//! Run with `DISCORD_WEBHOOK_URL=https://discord.com/api/webhooks/<id>/<token>
//! cargo run --example basic`.

use std::{env, error::Error, sync::Arc};

use femtologging_discord::{
    Attr, FemtoDiscordHandler, FemtoLevel, FemtoLogger, HandlerBuilderTrait, HandlerOption,
    StreamHandlerBuilder,
};

fn main() -> Result<(), Box<dyn Error>> {
    let url = env::var("DISCORD_WEBHOOK_URL")?;
    let console = StreamHandlerBuilder::stdout()
        .with_min_level(FemtoLevel::Warn)
        .build()?;

    let handler = FemtoDiscordHandler::new(
        &url,
        [
            HandlerOption::MinLevel(FemtoLevel::Warn),
            HandlerOption::SyncMode(true),
            HandlerOption::Handler(console),
        ],
    )?;

    let logger = FemtoLogger::new("demo", Arc::new(handler)).with("env", "local");
    logger.error("an error occurred", [Attr::new("error", "error msg")]);
    Ok(())
}
