//! gemline core library — config, LINE channel wire types and client,
//! Gemini client, and the webhook gateway used by the CLI binary.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod init;
pub mod llm;
