pub mod bot;
pub mod chatbot;
pub mod commands;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod mediator;
pub mod session;
pub mod types;

pub use bot::run;
