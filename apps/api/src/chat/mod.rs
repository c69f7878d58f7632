// Chat assistant: prompt composition, the completion round trip and its endpoints.

pub mod assistant;
pub mod composer;
pub mod handlers;
pub mod prompts;
