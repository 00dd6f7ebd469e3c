use std::sync::Arc;

use concierge_core::{Result, RetrievalResult, TextGenerator};

const CONTEXT_PLACEHOLDER: &str = "{context}";

/// System prompt for the concierge. Retrieved passages replace `{context}`.
pub const SYSTEM_TEMPLATE: &str = "You are a helpful hotel concierge assistant. \
Use the given context to answer questions about the hotel. \
Answer only from the context. If the context does not contain the answer, say that you don't know instead of guessing. \
Keep answers concise and friendly. Always be helpful and professional.\n\n\
Context: {context}";

const PASSAGE_SEPARATOR: &str = "\n\n";

/// Grounded answer synthesis over a hosted text model.
pub struct Generator {
    model: Arc<dyn TextGenerator>,
}

impl Generator {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn system_prompt(&self, context: &RetrievalResult) -> String {
        SYSTEM_TEMPLATE.replace(CONTEXT_PLACEHOLDER, &format_context(context))
    }

    /// One model call: system prompt with the ranked passages, then the question.
    pub async fn generate(&self, query: &str, context: &RetrievalResult) -> Result<String> {
        let system = self.system_prompt(context);
        tracing::debug!(model = self.model_name(), passages = context.len(), prompt_chars = system.len(), "generating answer");
        self.model.complete(&system, query).await
    }
}

/// Passage texts in ranked order, blank-line separated.
pub fn format_context(context: &RetrievalResult) -> String {
    context.chunks().map(|c| c.text.as_str()).collect::<Vec<_>>().join(PASSAGE_SEPARATOR)
}
