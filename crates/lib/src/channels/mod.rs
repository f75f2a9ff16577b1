//! LINE channel: webhook wire types, signature verification, and the
//! Messaging API client used to deliver replies and fetch message content.

mod events;
mod line;
pub mod signature;

pub use events::{
    CallbackRequest, ImageMessageContent, MessageContent, MessageEvent, Mention, Mentionee,
    Source, StickerMessageContent, TextMessageContent, WebhookEvent,
};
pub use line::{LineClient, LineError, MessageContentBlob};
