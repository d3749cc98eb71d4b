//! Classifier collaborator: HTTP client, prompt context, reply parsing

pub mod client;
pub mod context;
pub mod parser;

pub use client::LlmClient;
pub use context::BrainContext;
pub use parser::parse_reply;
