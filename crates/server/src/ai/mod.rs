//! AI features powered by Claude API

pub mod client;
pub mod estimator;

pub use client::ClaudeClient;
pub use estimator::{AiEstimate, AiReply};
