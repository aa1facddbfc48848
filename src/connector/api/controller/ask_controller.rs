use anyhow::Result;

use super::super::Container;

/// One-shot question in a fresh session.
pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String) -> Result<String> {
        let mut session = self.container.chat_session();
        let exchange = session.submit(&question).await?;
        Ok(exchange.answer().to_string())
    }
}
