//! Generative AI client (Google Gemini generateContent).

mod gemini;

pub use gemini::{GeminiClient, GeminiError};
