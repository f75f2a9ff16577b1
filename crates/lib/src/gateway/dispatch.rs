//! Event dispatcher: one pass over the callback batch, branching on
//! (message kind, source kind) to pick the reply strategy.

use crate::channels::{LineClient, MessageContent, MessageEvent, Source, WebhookEvent};
use crate::llm::GeminiClient;

/// Fixed reply when the bot is mentioned in a group.
pub const GROUP_GREETING: &str = "你好，我是 Gemini Chat Bot，請問有什麼可以幫助您的嗎？";

/// Prefix of the fixed reply when image recognition fails; the error text is appended.
pub const IMAGE_ERROR_PREFIX: &str = "無法辨識圖片內容，請重新輸入:";

/// Whether the rest of the batch is still processed after an event.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Process a callback batch in arrival order. A successful direct-chat reply,
/// a group greeting, or a failed content fetch ends the batch; all other
/// downstream errors are logged and the loop continues.
pub(crate) async fn process_events(
    line: &LineClient,
    gemini: &GeminiClient,
    events: Vec<WebhookEvent>,
) {
    for event in events {
        match event {
            WebhookEvent::Message(e) => {
                if handle_message(line, gemini, e).await == Flow::Stop {
                    return;
                }
            }
            WebhookEvent::Unknown => {
                log::info!("unsupported event kind, ignoring");
            }
        }
    }
}

async fn handle_message(line: &LineClient, gemini: &GeminiClient, event: MessageEvent) -> Flow {
    match event.message {
        MessageContent::Text(text) => match event.source {
            Source::User { user_id } => {
                log::info!("1 on 1 message from {}", user_id);
                let reply = match gemini.generate_text(&text.text).await {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("gemini chat failed: {}", e);
                        return Flow::Continue;
                    }
                };
                send_reply(line, &event.reply_token, &reply).await;
                // The batch ends after a direct-chat reply.
                Flow::Stop
            }
            Source::Group { group_id, .. } => {
                log::info!("group message, group id={}", group_id);
                let mentionees = text
                    .mention
                    .as_ref()
                    .map(|m| m.mentionees.as_slice())
                    .unwrap_or(&[]);
                for mention in mentionees {
                    log::info!(
                        "mention type={} user={:?} is_self={}",
                        mention.typ,
                        mention.user_id,
                        mention.is_self
                    );
                    if mention.mentions_bot() {
                        send_reply(line, &event.reply_token, GROUP_GREETING).await;
                        // The batch ends after greeting the group.
                        return Flow::Stop;
                    }
                }
                log::info!("group message done, bot not mentioned");
                Flow::Continue
            }
            Source::Room { room_id, .. } => {
                log::info!("room message, room id={}, not replying", room_id);
                Flow::Continue
            }
        },
        MessageContent::Sticker(sticker) => {
            let reply = format!(
                "sticker id is {}, stickerResourceType is {}",
                sticker.sticker_id, sticker.sticker_resource_type
            );
            send_reply(line, &event.reply_token, &reply).await;
            Flow::Continue
        }
        MessageContent::Image(image) => {
            let blob = match line.get_message_content(&image.id).await {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("get message content failed: {}", e);
                    // A content fetch failure ends the batch without a reply.
                    return Flow::Stop;
                }
            };
            let mime = blob.content_type.as_deref().unwrap_or("image/jpeg");
            let reply = match gemini.describe_image(&blob.bytes, mime).await {
                Ok(r) => r,
                Err(e) => format!("{}{}", IMAGE_ERROR_PREFIX, e),
            };
            send_reply(line, &event.reply_token, &reply).await;
            Flow::Continue
        }
        MessageContent::Unsupported => {
            log::info!("unsupported message content, ignoring");
            Flow::Continue
        }
    }
}

/// Deliver one reply; failures are logged and never surfaced to the sender.
async fn send_reply(line: &LineClient, reply_token: &str, text: &str) {
    match line.reply_message(reply_token, text).await {
        Ok(()) => log::info!("sent text reply"),
        Err(e) => log::warn!("reply delivery failed: {}", e),
    }
}
