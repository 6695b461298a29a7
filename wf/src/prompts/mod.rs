//! Prompt templates for Wayfarer
//!
//! Handlebars templates with embedded defaults and file overrides.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;
