//! Discord embed model and the mutable draft used to build it.
//!
//! [`Embed`] and [`WebhookMessage`] serialise to the JSON shape accepted by
//! Discord's execute-webhook endpoint. [`EmbedBuilder`] is the draft handed
//! to a [`MessageBuilder`]; its [`build`](EmbedBuilder::build) step clamps
//! text to Discord's documented limits so a verbose record cannot turn into
//! a rejected request.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

mod message_builder;

pub use message_builder::{DefaultMessageBuilder, MessageBuilder, SharedMessageBuilder};

/// Maximum characters in an embed title.
pub const MAX_TITLE_LEN: usize = 256;
/// Maximum characters in an embed description.
pub const MAX_DESCRIPTION_LEN: usize = 4096;
/// Maximum characters in a field name.
pub const MAX_FIELD_NAME_LEN: usize = 256;
/// Maximum characters in a field value.
pub const MAX_FIELD_VALUE_LEN: usize = 1024;
/// Maximum number of fields per embed.
pub const MAX_FIELDS: usize = 25;
/// Maximum characters in footer text.
pub const MAX_FOOTER_LEN: usize = 2048;

/// One `name: value` row of an embed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Rendered embed ready for delivery.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialise_timestamp"
    )]
    pub timestamp: Option<SystemTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

fn serialise_timestamp<S>(value: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(t) => {
            let t: DateTime<Utc> = (*t).into();
            serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        None => serializer.serialize_none(),
    }
}

/// Body posted to the webhook endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// A message carrying a single embed.
    pub fn from_embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }
}

/// Mutable embed draft.
#[derive(Clone, Debug, Default)]
pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.embed.title = Some(title.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.embed.description = Some(description.into());
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.embed.url = Some(url.into());
        self
    }

    pub fn set_timestamp(&mut self, timestamp: SystemTime) -> &mut Self {
        self.embed.timestamp = Some(timestamp);
        self
    }

    pub fn set_color(&mut self, color: u32) -> &mut Self {
        self.embed.color = Some(color);
        self
    }

    pub fn set_footer(&mut self, text: impl Into<String>) -> &mut Self {
        self.embed.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> &mut Self {
        self.embed.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Colour currently set on the draft.
    pub fn color(&self) -> Option<u32> {
        self.embed.color
    }

    /// Fields added so far.
    pub fn fields(&self) -> &[EmbedField] {
        &self.embed.fields
    }

    /// Produce the embed, truncating text and fields to Discord's limits.
    pub fn build(&self) -> Embed {
        let e = &self.embed;
        Embed {
            title: e.title.as_deref().map(|s| truncate(s, MAX_TITLE_LEN)),
            description: e
                .description
                .as_deref()
                .map(|s| truncate(s, MAX_DESCRIPTION_LEN)),
            url: e.url.clone(),
            timestamp: e.timestamp,
            color: e.color,
            footer: e.footer.as_ref().map(|f| EmbedFooter {
                text: truncate(&f.text, MAX_FOOTER_LEN),
            }),
            fields: e
                .fields
                .iter()
                .take(MAX_FIELDS)
                .map(|f| EmbedField {
                    name: truncate(&f.name, MAX_FIELD_NAME_LEN),
                    value: truncate(&f.value, MAX_FIELD_VALUE_LEN),
                    inline: f.inline,
                })
                .collect(),
        }
    }
}

/// Truncate to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn serialises_discord_shape() {
        let mut eb = EmbedBuilder::new();
        eb.set_title("ERROR")
            .set_description("failed")
            .set_timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(1))
            .set_color(0xFF0000)
            .add_field("error", "boom", false);
        let json = serde_json::to_value(WebhookMessage::from_embed(eb.build())).expect("json");
        let embed = &json["embeds"][0];
        assert_eq!(embed["title"], "ERROR");
        assert_eq!(embed["description"], "failed");
        assert_eq!(embed["timestamp"], "1970-01-01T00:00:01.000Z");
        assert_eq!(embed["color"], 0xFF0000);
        assert_eq!(embed["fields"][0]["name"], "error");
        assert_eq!(embed["fields"][0]["value"], "boom");
        assert_eq!(embed["fields"][0]["inline"], false);
        assert!(json.get("username").is_none());
        assert!(embed.get("url").is_none());
    }

    #[rstest]
    fn empty_embed_omits_optional_keys() {
        let json = serde_json::to_value(Embed::default()).expect("json");
        assert_eq!(json, serde_json::json!({}));
    }

    #[rstest]
    fn clamps_to_discord_limits() {
        let mut eb = EmbedBuilder::new();
        eb.set_title("t".repeat(300));
        for i in 0..30 {
            eb.add_field(format!("k{i}"), "v".repeat(2000), true);
        }
        let embed = eb.build();
        let title = embed.title.expect("title");
        assert_eq!(title.chars().count(), MAX_TITLE_LEN);
        assert!(title.ends_with('…'));
        assert_eq!(embed.fields.len(), MAX_FIELDS);
        assert_eq!(embed.fields[0].value.chars().count(), MAX_FIELD_VALUE_LEN);
        assert_eq!(eb.fields().len(), 30);
    }

    #[rstest]
    #[case("short", 10, "short")]
    #[case("héllo wörld", 5, "héll…")]
    #[case("abc", 3, "abc")]
    fn truncates_on_char_boundaries(#[case] input: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate(input, max), expected);
    }
}
