//! Inbox Assist: a prompt-driven email productivity agent.

pub mod analyzer;
pub mod calendar;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod store;
