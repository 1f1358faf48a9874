use crate::error::VigilError;

/// Renders text templates (the advisory prompt) against a JSON context.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, VigilError>;
}
