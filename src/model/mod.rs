//! Model invocation service client and prompt templating

pub mod client;
pub mod prompt;

pub use client::{CallOptions, HttpModelClient, ModelClient, ModelReply, TokenUsage};
