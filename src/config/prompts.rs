//! Prompt templates for Vidask.
//!
//! Prompts can be customized by pointing `prompts.custom_path` at a TOML file
//! overriding the defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
}

/// Prompts for answer synthesis from retrieved transcript excerpts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a research assistant that answers questions about a single video using retrieved transcript excerpts.

Structure every answer with exactly these sections:
- Summary
- Key Findings
- Detailed Analysis
- Connections
- Additional Context

Guidelines:
- Ground every claim in the provided excerpts; do not invent details
- If no excerpts are provided or none are relevant, state clearly that no relevant content was found in the video and leave the remaining sections brief
- Write clear, well-organized prose under each section heading"#
                .to_string(),

            user: r#"Question: {{question}}

Retrieved excerpts from the video transcript:

{{context}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, optionally overriding defaults from a TOML file.
    pub fn load(custom_path: Option<&Path>) -> Result<Self> {
        match custom_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let prompts: Prompts = toml::from_str(&content)?;
                Ok(prompts)
            }
            None => Ok(Prompts::default()),
        }
    }

    /// Render a template, substituting `{{name}}` placeholders.
    pub fn render(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut output = template.to_string();
        for (name, value) in vars {
            output = output.replace(&format!("{{{{{}}}}}", name), value);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let prompts = Prompts::default();
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is covered?".to_string());
        vars.insert("context".to_string(), "[1] An excerpt.".to_string());

        let rendered = prompts.render(&prompts.answer.user, &vars);
        assert!(rendered.contains("What is covered?"));
        assert!(rendered.contains("[1] An excerpt."));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_default_system_prompt_names_sections() {
        let prompts = Prompts::default();
        for section in [
            "Summary",
            "Key Findings",
            "Detailed Analysis",
            "Connections",
            "Additional Context",
        ] {
            assert!(prompts.answer.system.contains(section));
        }
    }
}
