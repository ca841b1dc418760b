pub mod chunks;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod store;
