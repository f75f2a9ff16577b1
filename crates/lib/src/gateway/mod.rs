//! Gateway: the webhook HTTP server and the event dispatcher.
//!
//! `POST /callback` receives LINE webhook batches; each event is matched on
//! (message kind, source kind) and answered via Gemini and the reply API.

mod dispatch;
mod server;

pub use dispatch::{GROUP_GREETING, IMAGE_ERROR_PREFIX};
pub use server::{run_gateway, GatewayState};
