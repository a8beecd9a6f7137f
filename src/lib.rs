pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod image_input;
pub mod interactive;
pub mod orchestrator;
pub mod progress;
pub mod provider;
pub mod report;
