//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::PathBuf;

use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::config::PromptsConfig;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Configured override directory (config `prompts.dir`)
    override_dir: Option<PathBuf>,
    /// Project-local directory (`.wayfarer/prompts/`)
    local_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader from configuration
    pub fn new(config: &PromptsConfig) -> Self {
        let override_dir = config.dir.as_ref().map(PathBuf::from).filter(|p| p.exists());
        let local_dir = Some(PathBuf::from(".wayfarer/prompts")).filter(|p| p.exists());

        Self { hbs: engine(), override_dir, local_dir }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self { hbs: engine(), override_dir: None, local_dir: None }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Configured override: `{prompts.dir}/{name}.pmt`
    /// 2. Project-local: `.wayfarer/prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        for dir in [&self.override_dir, &self.local_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

fn engine() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    // Prompts are plain text, not HTML: leave embedded JSON unescaped
    hbs.register_escape_fn(handlebars::no_escape);
    hbs
}
