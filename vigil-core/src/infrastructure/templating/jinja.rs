// vigil-core/src/infrastructure/templating/jinja.rs

// Renders the advisory prompt handed to the phrasing service.

use minijinja::{Environment, UndefinedBehavior};

use crate::application::ports::TemplateEngine;
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // A typo in the prompt must fail loudly, not send a blank section.
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // {{ facts | bullets }} -> "- a\n- b"
        env.add_filter("bullets", |items: Vec<String>| -> String {
            items
                .iter()
                .map(|i| format!("- {}", i))
                .collect::<Vec<_>>()
                .join("\n")
        });
        env.add_filter("upper", |value: &str| value.to_uppercase());
        env.add_filter("lower", |value: &str| value.to_lowercase());

        Self { env }
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, VigilError> {
        self.env
            .render_str(template, context)
            .map_err(|e| VigilError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}
