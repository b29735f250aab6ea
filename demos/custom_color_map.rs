//! Colour INFO embeds purple; unmapped levels fall back to black.

use std::{env, error::Error, sync::Arc};

use femtologging_discord::{
    Attr, ColorMap, FemtoDiscordHandler, FemtoLevel, FemtoLogger, HandlerOption,
};

fn main() -> Result<(), Box<dyn Error>> {
    let url = env::var("DISCORD_WEBHOOK_URL")?;
    let colors = ColorMap::new().with(FemtoLevel::Info, 0xA020F0);

    let handler = FemtoDiscordHandler::new(&url, [HandlerOption::ColorMap(colors)])?;
    let logger = FemtoLogger::new("demo", Arc::new(handler))
        .with("env", "local")
        .with_group("request");
    logger.info(
        "incoming request",
        [
            Attr::new("payload", "some payload"),
            Attr::new("user_id", "some_user_id"),
        ],
    );

    // Asynchronous delivery: wait for the worker pool before exiting.
    logger.flush();
    Ok(())
}
