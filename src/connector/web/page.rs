use minijinja::{context, Environment};

use crate::domain::{Exchange, PersonaConfig};

const INDEX_TEMPLATE_NAME: &str = "index.html";

// `.html` template names are auto-escaped by minijinja.
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>
    body { font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
    textarea { width: 100%; height: 100px; box-sizing: border-box; }
    .error { background: #fde8e8; border: 1px solid #e02424; padding: .75rem; margin: 1rem 0; }
    .conversation { max-height: 70vh; overflow-y: auto; }
    .question { color: #057a55; font-weight: bold; }
    .answer { white-space: pre-wrap; }
  </style>
</head>
<body>
  <h1>{{ title }}</h1>
  <details open>
    <summary>Ask anything about Mumbai or any other topic</summary>
    <form method="post" action="/ask">
      <label for="question">Your Question</label>
      <textarea id="question" name="question"></textarea>
      <button type="submit">Submit</button>
    </form>
  </details>
  {% if error %}<div class="error" role="alert">{{ error }}</div>{% endif %}
  <hr>
  <h2>Conversation</h2>
  <div class="conversation">
  {% for exchange in exchanges %}
    <p class="question">You: {{ exchange.question }}</p>
    <div class="answer">{{ exchange.answer }}</div>
    <hr>
  {% else %}
    <p>No conversation yet.</p>
  {% endfor %}
  </div>
</body>
</html>
"#;

/// Renders the single page from a transcript.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// `exchanges` are rendered in the order given; pass them newest first.
    pub fn render_index(
        &self,
        persona: &PersonaConfig,
        exchanges: &[Exchange],
        error: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(INDEX_TEMPLATE_NAME)?;
        template.render(context! {
            title => persona.title(),
            exchanges => exchanges,
            error => error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_shows_placeholder() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_index(&PersonaConfig::mumbai_local(), &[], None)
            .unwrap();

        assert!(html.contains("No conversation yet."));
        assert!(html.contains("<textarea id=\"question\" name=\"question\">"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn exchanges_render_in_given_order() {
        let renderer = PageRenderer::new().unwrap();
        let exchanges = vec![
            Exchange::new("And bawa?", "Bawa is slang for a Parsi person.", 2),
            Exchange::new("What is jugaad?", "Jugaad means a clever workaround.", 1),
        ];

        let html = renderer
            .render_index(&PersonaConfig::mumbai_local(), &exchanges, None)
            .unwrap();

        let bawa = html.find("You: And bawa?").unwrap();
        let jugaad = html.find("You: What is jugaad?").unwrap();
        assert!(bawa < jugaad);
        assert!(!html.contains("No conversation yet."));
    }

    #[test]
    fn answers_and_errors_are_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let exchanges = vec![Exchange::new("<b>q</b>", "<script>alert(1)</script>", 1)];

        let html = renderer
            .render_index(
                &PersonaConfig::mumbai_local(),
                &exchanges,
                Some("<i>boom</i>"),
            )
            .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;i&gt;boom"));
    }
}
