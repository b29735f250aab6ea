//! Pluggable conversion from records to embeds.

use std::{fmt, sync::Arc};

use super::{Embed, EmbedBuilder};
use crate::{flatten::FlatAttr, log_record::FemtoLogRecord};

/// Turns a record and its flattened attributes into an embed.
///
/// The draft arrives pre-coloured from the handler's colour map. Builders
/// may overwrite any part of it, colour included.
///
/// Any `Fn(&FemtoLogRecord, &[FlatAttr], &mut EmbedBuilder) -> Embed` that is
/// `Send + Sync` implements this trait.
pub trait MessageBuilder: Send + Sync {
    fn build(&self, record: &FemtoLogRecord, attrs: &[FlatAttr], draft: &mut EmbedBuilder)
    -> Embed;
}

impl<F> MessageBuilder for F
where
    F: Fn(&FemtoLogRecord, &[FlatAttr], &mut EmbedBuilder) -> Embed + Send + Sync,
{
    fn build(
        &self,
        record: &FemtoLogRecord,
        attrs: &[FlatAttr],
        draft: &mut EmbedBuilder,
    ) -> Embed {
        self(record, attrs, draft)
    }
}

/// Title from the level, description from the message, one field per
/// attribute.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultMessageBuilder;

impl MessageBuilder for DefaultMessageBuilder {
    fn build(
        &self,
        record: &FemtoLogRecord,
        attrs: &[FlatAttr],
        draft: &mut EmbedBuilder,
    ) -> Embed {
        draft
            .set_title(record.level_str())
            .set_description(record.message())
            .set_timestamp(record.timestamp());
        for attr in attrs {
            draft.add_field(attr.key.as_str(), attr.value.to_text(), false);
        }
        draft.build()
    }
}

/// Shared message builder trait object.
#[derive(Clone)]
pub struct SharedMessageBuilder {
    inner: Arc<dyn MessageBuilder>,
}

impl SharedMessageBuilder {
    pub fn new<B>(builder: B) -> Self
    where
        B: MessageBuilder + 'static,
    {
        Self {
            inner: Arc::new(builder),
        }
    }

    /// Wrap a closure; the signature is spelled out so callers need no
    /// parameter annotations.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&FemtoLogRecord, &[FlatAttr], &mut EmbedBuilder) -> Embed + Send + Sync + 'static,
    {
        Self::new(f)
    }

    pub fn build(
        &self,
        record: &FemtoLogRecord,
        attrs: &[FlatAttr],
        draft: &mut EmbedBuilder,
    ) -> Embed {
        self.inner.build(record, attrs, draft)
    }
}

impl Default for SharedMessageBuilder {
    fn default() -> Self {
        Self::new(DefaultMessageBuilder)
    }
}

impl fmt::Debug for SharedMessageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedMessageBuilder(<dyn MessageBuilder>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::FemtoLevel;
    use rstest::{fixture, rstest};
    use std::time::{Duration, SystemTime};

    #[fixture]
    fn record() -> FemtoLogRecord {
        FemtoLogRecord::new("svc", FemtoLevel::Error, "incoming request")
            .at(SystemTime::UNIX_EPOCH + Duration::from_secs(60))
    }

    #[rstest]
    fn default_builder_renders_level_message_and_fields(record: FemtoLogRecord) {
        let attrs = vec![
            FlatAttr::new("request.user_id", "u1"),
            FlatAttr::new("attempt", 2_i64),
        ];
        let mut draft = EmbedBuilder::new();
        draft.set_color(0xFF0000);
        let embed = DefaultMessageBuilder.build(&record, &attrs, &mut draft);

        assert_eq!(embed.title.as_deref(), Some("ERROR"));
        assert_eq!(embed.description.as_deref(), Some("incoming request"));
        assert_eq!(embed.timestamp, Some(record.timestamp()));
        assert_eq!(embed.color, Some(0xFF0000));
        let fields: Vec<_> = embed
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str(), f.inline))
            .collect();
        assert_eq!(
            fields,
            [("request.user_id", "u1", false), ("attempt", "2", false)]
        );
    }

    #[rstest]
    fn closures_can_override_colour(record: FemtoLogRecord) {
        let custom = SharedMessageBuilder::from_fn(|record, attrs, eb| {
            eb.set_title(format!("Custom Title - Level {}", record.level));
            if record.level == FemtoLevel::Error {
                eb.set_color(0xE30B5C);
            }
            for attr in attrs {
                eb.add_field(attr.key.as_str(), attr.value.to_text(), true);
            }
            eb.build()
        });
        let mut draft = EmbedBuilder::new();
        draft.set_color(0xFF0000);
        let embed = custom.build(&record, &[FlatAttr::new("k", "v")], &mut draft);
        assert_eq!(embed.title.as_deref(), Some("Custom Title - Level ERROR"));
        assert_eq!(embed.color, Some(0xE30B5C));
        assert!(embed.fields[0].inline);
    }
}
