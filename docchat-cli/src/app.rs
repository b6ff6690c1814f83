//! Wires an [`AppConfig`] into a ready [`Session`].

use std::sync::Arc;

use docchat_core::{Llm, Result};
use docchat_rag::{
    Chunker, EmbeddingProvider, LineChunker, ParagraphChunker, RagConfig, ResilientEmbedder,
    RetrievalEngine,
};
use docchat_session::{AnswerService, Session};
use docchat_tool::SerpApiSearch;
use tracing::{info, warn};

use crate::config::{AppConfig, Provider};

/// Dimensionality used when no embedding provider is configured.
const OFFLINE_DIMENSIONS: usize = 768;

#[cfg(not(all(feature = "gemini", feature = "openai")))]
fn unsupported(provider: &str) -> docchat_core::DocChatError {
    docchat_core::DocChatError::Config(format!(
        "docchat was built without the '{provider}' feature"
    ))
}

fn build_llm(config: &AppConfig) -> Result<Arc<dyn Llm>> {
    match config.provider {
        #[cfg(feature = "gemini")]
        Provider::Gemini => Ok(Arc::new(
            docchat_model::GeminiModel::new(
                config.generation_api_key.clone(),
                config.model.clone(),
            )?
            .with_timeout(config.generation_timeout)?,
        )),
        #[cfg(not(feature = "gemini"))]
        Provider::Gemini => Err(unsupported("gemini")),
        #[cfg(feature = "openai")]
        Provider::OpenAi => Ok(Arc::new(
            docchat_model::OpenAIModel::new(
                config.generation_api_key.clone(),
                config.model.clone(),
            )?
            .with_timeout(config.generation_timeout)?,
        )),
        #[cfg(not(feature = "openai"))]
        Provider::OpenAi => Err(unsupported("openai")),
    }
}

fn build_embedding_provider(
    config: &AppConfig,
    api_key: &str,
) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        #[cfg(feature = "gemini")]
        Provider::Gemini => {
            let mut provider = docchat_rag::GeminiEmbeddingProvider::new(api_key)?;
            if let Some(model) = &config.embedding_model {
                provider = provider.with_model(model.clone());
            }
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "gemini"))]
        Provider::Gemini => Err(unsupported("gemini")),
        #[cfg(feature = "openai")]
        Provider::OpenAi => {
            let mut provider = docchat_rag::OpenAIEmbeddingProvider::new(api_key)?;
            if let Some(model) = &config.embedding_model {
                provider = provider.with_model(model.clone());
            }
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "openai"))]
        Provider::OpenAi => Err(unsupported("openai")),
    }
}

fn build_engine(config: &AppConfig) -> Result<RetrievalEngine> {
    let provider = config
        .embedding_api_key
        .as_deref()
        .map(|key| build_embedding_provider(config, key))
        .transpose()?;
    if provider.is_none() {
        warn!("embeddings are offline; retrieval ranking will be arbitrary");
    }

    let dimensions = provider.as_ref().map_or(OFFLINE_DIMENSIONS, |p| p.dimensions());
    let rag_config = RagConfig::builder().top_k(config.top_k).dimensions(dimensions).build()?;
    let chunker: Arc<dyn Chunker> =
        if config.paragraphs { Arc::new(ParagraphChunker) } else { Arc::new(LineChunker) };

    Ok(RetrievalEngine::builder()
        .embedder(ResilientEmbedder::from_optional(provider, rag_config.clone()))
        .config(rag_config)
        .chunker(chunker)
        .build()?)
}

/// Build a session for `config`. Nothing here touches the network.
pub fn build_session(config: &AppConfig) -> Result<Session> {
    let llm = build_llm(config)?;
    let mut service = AnswerService::new(build_engine(config)?, llm.clone());

    if let Some(serpapi_key) = &config.web_search {
        if serpapi_key.is_none() {
            warn!("web search enabled without SERPAPI_KEY; results will be unavailable");
        }
        service = service.with_web_search(Arc::new(SerpApiSearch::new(serpapi_key.clone())));
    }

    let mut session = Session::new(service);
    session.set_mode(config.mode);
    info!(
        session.id = %session.id(),
        model = llm.name(),
        top_k = config.top_k,
        web_search = config.web_search.is_some(),
        "session ready"
    );
    Ok(session)
}
