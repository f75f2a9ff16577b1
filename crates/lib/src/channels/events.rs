//! LINE webhook payload types.
//!
//! Each axis of the dispatch (event kind, message kind, source kind) is a
//! closed tagged enum so the gateway can match exhaustively; unknown tags
//! land in a catch-all variant instead of failing the whole callback.

use serde::Deserialize;

/// Webhook request body: the callback batch delivered in one HTTP call.
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event. Only message events are handled; everything else
/// (follow, unfollow, postback, ...) is logged and ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    #[serde(other)]
    Unknown,
}

/// A message event: reply token, originating source, and the message content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    pub source: Source,
    pub message: MessageContent,
}

/// Where the message came from: 1-on-1 chat, group, or room.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Source {
    #[serde(rename_all = "camelCase")]
    User { user_id: String },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        room_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
}

/// Kind-specific message payload.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text(TextMessageContent),
    Sticker(StickerMessageContent),
    Image(ImageMessageContent),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageContent {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    /// Present on group messages that tag users.
    #[serde(default)]
    pub mention: Option<Mention>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerMessageContent {
    pub sticker_id: String,
    pub sticker_resource_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMessageContent {
    /// Message id; the binary body is fetched from the content API.
    pub id: String,
}

/// Mention block on a group text message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    #[serde(default)]
    pub mentionees: Vec<Mentionee>,
}

/// One tagged entity in a group message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentionee {
    /// "user" or "all".
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// True when the tagged user is this bot.
    #[serde(default)]
    pub is_self: bool,
}

impl Mentionee {
    /// True when this mentionee is a user mention of the bot itself.
    pub fn mentions_bot(&self) -> bool {
        self.typ == "user" && self.is_self
    }
}
