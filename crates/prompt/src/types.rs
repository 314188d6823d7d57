//! Prompt types for the Sikkim Tourism Assistant.

use serde::{Deserialize, Serialize};

/// A prompt definition: a Handlebars template plus its identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// The built-in tourism-assistant prompt used for every generation call.
    pub fn assistant_default() -> Self {
        Self {
            id: "assistant.chat.default".to_string(),
            template: "\
You are a helpful Sikkim Tourism Assistant that specializes in providing \
information about Sikkim's monasteries, culture, food, weather, trekking, and festivals.

User message: {{message}}

Provide a helpful, informative response about Sikkim based on the user's query. \
Keep your response concise and focused on Sikkim tourism.\
{{#if language_instruction}}

{{language_instruction}}{{/if}}"
                .to_string(),
        }
    }
}

/// A fully built prompt ready for a generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// The rendered prompt text
    pub text: String,

    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_definition() {
        let def = PromptDefinition::assistant_default();
        assert_eq!(def.id, "assistant.chat.default");
        assert!(def.template.contains("{{message}}"));
        assert!(def.template.contains("Sikkim Tourism Assistant"));
    }
}
