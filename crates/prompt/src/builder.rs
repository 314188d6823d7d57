//! Prompt builder for rendering the generation template.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use serde_json::json;
use sikkim_core::{AppError, AppResult};

/// Build a generation prompt from a definition, a user message, and an
/// optional language hint.
///
/// The hint only adds a respond-in-language instruction to the rendered
/// text; callers outside this crate never branch on it.
///
/// # Example
/// ```
/// use sikkim_prompt::{build_prompt, PromptDefinition};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = PromptDefinition::assistant_default();
/// let built = build_prompt(&def, "plan a day in Gangtok", None)?;
/// assert!(built.text.contains("plan a day in Gangtok"));
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    message: &str,
    lang: Option<&str>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let variables = json!({
        "message": message,
        "language_instruction": language_instruction(lang),
    });

    let rendered = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        text: rendered,
        source_prompt_id: definition.id.clone(),
    })
}

/// Resolve the language hint to a prompt instruction.
fn language_instruction(lang: Option<&str>) -> Option<&'static str> {
    match lang {
        Some("hi") => Some("Respond in Hindi, using Devanagari script."),
        _ => None,
    }
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &serde_json::Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
