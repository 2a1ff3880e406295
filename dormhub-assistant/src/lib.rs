pub mod client;

pub use client::{AssistantClient, AssistantError, ChatRole, ChatTurn};
