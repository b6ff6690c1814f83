//! The question-answering entry point.

use std::sync::Arc;

use docchat_core::{Llm, Mode, WebSearch};
use docchat_rag::{Document, IndexSummary, PromptAssembler, RetrievalEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Answer returned while no document is loaded.
pub const NO_DOCUMENT_MESSAGE: &str = "Please upload a TXT file first to ask questions about it.";

/// Prefix of the answer returned when generation fails.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating response";

/// Whether questions can be answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No index; every question gets [`NO_DOCUMENT_MESSAGE`].
    NoDocument,
    /// An index is loaded.
    Ready,
}

/// Turns a question into an answer: retrieve, optionally search the web,
/// assemble the prompt, generate.
///
/// # Example
///
/// ```rust,ignore
/// let service = AnswerService::new(engine, Arc::new(model))
///     .with_web_search(Arc::new(SerpApiSearch::new(serpapi_key)));
///
/// service.upload(&Document::new("notes.txt", text)).await?;
/// let answer = service.answer("What is the capital of France?", Mode::Concise).await;
/// ```
pub struct AnswerService {
    engine: RetrievalEngine,
    llm: Arc<dyn Llm>,
    web_search: Option<Arc<dyn WebSearch>>,
    assembler: PromptAssembler,
    top_k: usize,
}

impl AnswerService {
    /// Create a service retrieving `config().top_k` chunks per question.
    pub fn new(engine: RetrievalEngine, llm: Arc<dyn Llm>) -> Self {
        let top_k = engine.config().top_k;
        Self { engine, llm, web_search: None, assembler: PromptAssembler, top_k }
    }

    /// Augment prompts with web search snippets.
    pub fn with_web_search(mut self, web_search: Arc<dyn WebSearch>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    /// Override the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// The retrieval engine.
    pub fn engine(&self) -> &RetrievalEngine {
        &self.engine
    }

    /// Whether web search augmentation is enabled.
    pub fn web_search_enabled(&self) -> bool {
        self.web_search.is_some()
    }

    /// Index `document`, replacing any previously loaded one.
    ///
    /// An empty document is rejected with
    /// [`RagError::InputError`](docchat_rag::RagError::InputError) and the
    /// previous index stays active.
    pub async fn upload(&self, document: &Document) -> docchat_rag::Result<IndexSummary> {
        self.engine.load(document).await
    }

    /// The current state.
    pub async fn state(&self) -> SessionState {
        if self.engine.is_loaded().await { SessionState::Ready } else { SessionState::NoDocument }
    }

    /// Answer `query` in `mode`.
    ///
    /// Never fails: without a document the answer is [`NO_DOCUMENT_MESSAGE`]
    /// and a generation failure is rendered as the answer text.
    pub async fn answer(&self, query: &str, mode: Mode) -> String {
        // The same snapshot gates the question and supplies its context.
        let Some(index) = self.engine.snapshot().await else {
            debug!("question asked before any document was loaded");
            return NO_DOCUMENT_MESSAGE.to_string();
        };

        let chunks: Vec<String> = self
            .engine
            .retrieve_from(&index, query, self.top_k)
            .await
            .into_iter()
            .map(|scored| scored.chunk.text)
            .collect();
        let web_results = match &self.web_search {
            Some(search) => search.search(query).await,
            None => Vec::new(),
        };

        let prompt = self.assembler.build(query, &chunks, &web_results, mode);
        debug!(
            prompt_len = prompt.len(),
            chunks = chunks.len(),
            web_results = web_results.len(),
            "assembled prompt"
        );

        match self.llm.generate(&prompt, mode).await {
            Ok(answer) => {
                info!(
                    model = self.llm.name(),
                    %mode,
                    answer_len = answer.len(),
                    "answer generated"
                );
                answer
            }
            Err(e) => {
                error!(model = self.llm.name(), error = %e, "generation failed");
                format!("{GENERATION_ERROR_PREFIX}: {e}")
            }
        }
    }
}
