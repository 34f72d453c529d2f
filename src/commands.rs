use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::{error, info};

use ai_llm_service::LlmServiceProfiles;
use api::AppState;
use rag_store::{
    CollectionNames, RagConfig, RagStore, ServiceEmbedder, load_document_chunks, load_faq_entries,
};
use urag_engine::{EngineConfig, UragService};

use crate::cli::Commands;
use crate::formatting::{format_answer, format_stats};

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

pub async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Serve => serve().await,
        Commands::Index { recreate } => index(recreate).await,
        Commands::Ask { questions } => ask(&questions).await,
        Commands::Stats => stats().await,
    }
}

struct Settings {
    engine: EngineConfig,
    rag: RagConfig,
    names: CollectionNames,
}

fn settings() -> Result<Settings> {
    let engine = EngineConfig::from_env()?;
    let names = CollectionNames::from_env();
    let rag = RagConfig::from_env(names.faq.clone())?;
    Ok(Settings { engine, rag, names })
}

async fn serve() -> Result<()> {
    let addr = std::env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());
    let s = settings()?;

    let (service, llm) = match LlmServiceProfiles::from_env() {
        Ok(llm) => {
            let llm = Arc::new(llm);
            let service = UragService::initialize(s.engine, &s.rag, &s.names, llm.clone()).await;
            (service, Some(llm))
        }
        Err(e) => {
            let reason = format!("LLM providers unavailable: {e}");
            error!(%reason, "engine initialization failed");
            (UragService::degraded(reason, false, false), None)
        }
    };

    api::start(Arc::new(AppState::new(service, llm)), &addr).await?;
    Ok(())
}

async fn index(recreate: bool) -> Result<()> {
    let s = settings()?;
    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let embedder = ServiceEmbedder::new(llm, s.rag.embedding_dim);

    let faqs = load_faq_entries(&s.engine.faq_records_file)?;
    let chunks = load_document_chunks(&s.engine.augmented_docs_file)?;
    info!(faqs = faqs.len(), chunks = chunks.len(), recreate, "artifacts loaded");

    let faq_store = RagStore::new(s.rag.with_collection(&s.names.faq))?;
    let faq_points = faq_store.index_faqs(&faqs, &embedder, recreate).await?;
    println!(
        "{} {} points into '{}'",
        "Indexed".green().bold(),
        faq_points,
        s.names.faq
    );

    let doc_store = RagStore::new(s.rag.with_collection(&s.names.documents))?;
    let doc_points = doc_store
        .index_documents(&chunks, &embedder, recreate)
        .await?;
    println!(
        "{} {} points into '{}'",
        "Indexed".green().bold(),
        doc_points,
        s.names.documents
    );
    Ok(())
}

/// Initializes the service and refuses to continue when it comes up degraded.
async fn ready_service() -> Result<UragService> {
    let s = settings()?;
    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let service = UragService::initialize(s.engine, &s.rag, &s.names, llm).await;
    if !service.is_ready() {
        let reason = service.health().reason.unwrap_or_default();
        bail!("service not ready: {reason}");
    }
    Ok(service)
}

async fn ask(questions: &[String]) -> Result<()> {
    let service = ready_service().await?;
    for q in questions {
        let r = service.answer(q).await?;
        print!("{}", format_answer(q, &r));
    }
    Ok(())
}

async fn stats() -> Result<()> {
    let service = ready_service().await?;
    let s = service.stats().await?;
    print!("{}", format_stats(&s));
    Ok(())
}
