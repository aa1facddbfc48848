use serde::Serialize;

pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";

const DEFAULT_NAME: &str = "Basic Q&A Agent";
const DEFAULT_TITLE: &str = "Mumbai Local 🚆!";

const DEFAULT_DESCRIPTION: &str = "
    - Think of yourself as an enthusiastic assistant, ready to help you with any questions you have.
    - You have deep knowledge about the world, and about Mumbai in particular.
";

const DEFAULT_INSTRUCTIONS: &str = r#"
    - You are a local from Mumbai, India, who is proficient in English as well as local slang.
    - Don't limit your responses to questions about Mumbai as your knowledge is NOT limited to Mumbai
      alone. Answer any question from the user.
    - Use casual English in your response, but throw in Mumbai slang words (such as "fundu", "jugaad",
      "bawa", "bole to", "gyaan", "aapunki" etc.) - it will make you more relatable. Add a meaning of the
      Mumbai slang in brackets the first time you use it in a conversation, so non-Mumbai folks can
      understand aapunki bhaasha (slang for "our lingo").
    - Don't start all your responses with "Ayy" - use some variety, your responses need not always sound
      like a local "tapori" (slang for a "street thug").
"#;

/// The fixed persona a responder answers as.
///
/// Immutable once built: there are no setters, and every field is exposed
/// through a borrowing accessor. Text blocks are dedented and trimmed on
/// construction so indented literals and TOML multi-line strings render the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaConfig {
    name: String,
    title: String,
    model_id: String,
    description: String,
    instructions: String,
}

impl PersonaConfig {
    pub fn new(
        model_id: impl Into<String>,
        description: impl AsRef<str>,
        instructions: impl AsRef<str>,
    ) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            model_id: model_id.into().trim().to_string(),
            description: dedent(description.as_ref()),
            instructions: dedent(instructions.as_ref()),
        }
    }

    /// The built-in Mumbai persona.
    pub fn mumbai_local() -> Self {
        Self::new(DEFAULT_MODEL_ID, DEFAULT_DESCRIPTION, DEFAULT_INSTRUCTIONS)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into().trim().to_string();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into().trim().to_string();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into().trim().to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Render description and instructions as one system prompt.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();
        if !self.description.is_empty() {
            prompt.push_str(&self.description);
        }
        if !self.instructions.is_empty() {
            if !prompt.is_empty() {
                prompt.push_str("\n\n");
            }
            prompt.push_str("<instructions>\n");
            prompt.push_str(&self.instructions);
            prompt.push_str("\n</instructions>");
        }
        prompt
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self::mumbai_local()
    }
}

/// Strip the common leading indentation of all non-blank lines, then trim
/// surrounding blank lines and trailing whitespace.
pub(crate) fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l.get(indent..).unwrap_or_else(|| l.trim_start()).trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedent_removes_common_indent() {
        let text = "\n    - first\n      continued\n    - second\n";
        assert_eq!(dedent(text), "- first\n  continued\n- second");
    }

    #[test]
    fn dedent_keeps_inner_blank_lines() {
        assert_eq!(dedent("  a\n\n  b"), "a\n\nb");
    }

    #[test]
    fn mumbai_persona_targets_gemini_flash() {
        let persona = PersonaConfig::mumbai_local();
        assert_eq!(persona.model_id(), "gemini-2.0-flash");
        assert!(persona.description().starts_with("- Think of yourself"));
        assert!(persona.instructions().contains("jugaad"));
    }

    #[test]
    fn system_prompt_wraps_instructions() {
        let persona = PersonaConfig::new("m", "You are helpful.", "- Be brief.");
        assert_eq!(
            persona.system_prompt(),
            "You are helpful.\n\n<instructions>\n- Be brief.\n</instructions>"
        );
    }

    #[test]
    fn system_prompt_without_instructions_is_description_only() {
        let persona = PersonaConfig::new("m", "Just a description", "");
        assert_eq!(persona.system_prompt(), "Just a description");
    }

    #[test]
    fn model_override_keeps_texts() {
        let persona = PersonaConfig::mumbai_local().with_model_id(" gemini-1.5-pro ");
        assert_eq!(persona.model_id(), "gemini-1.5-pro");
        assert_eq!(persona.description(), PersonaConfig::mumbai_local().description());
    }
}
