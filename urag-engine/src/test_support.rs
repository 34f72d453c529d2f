//! In-memory providers for engine tests.

use std::{
    future::Future,
    ops::Deref,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use rag_store::{EmbeddingsProvider, RagError, RetrievalHit, SimilarityIndex, fields};
use serde_json::{Map, json};

use crate::cfg::EngineConfig;
use crate::engine::EngineContext;
use crate::error::EngineError;
use crate::llm::GenerationProvider;

pub fn faq_hit(faq_id: &str, text: &str, score: f32, ordinal: u64) -> RetrievalHit {
    let mut metadata = Map::new();
    metadata.insert(fields::FAQ_ID.into(), json!(faq_id));
    metadata.insert(fields::TEXT.into(), json!(text));
    metadata.insert(fields::ANSWER.into(), json!(format!("answer for {faq_id}")));
    metadata.insert(fields::KIND.into(), json!("main_question"));
    metadata.insert(fields::ORDINAL.into(), json!(ordinal));
    RetrievalHit {
        item_id: format!("{faq_id}-{ordinal}"),
        score,
        metadata,
    }
}

pub fn doc_hit(doc_id: &str, url: Option<&str>, score: f32, ordinal: u64) -> RetrievalHit {
    let mut metadata = Map::new();
    metadata.insert(fields::DOC_ID.into(), json!(doc_id));
    metadata.insert(fields::TEXT.into(), json!(format!("augmented {doc_id}")));
    if let Some(u) = url {
        metadata.insert(fields::URL.into(), json!(u));
    }
    metadata.insert(fields::ORDINAL.into(), json!(ordinal));
    RetrievalHit {
        item_id: format!("pt-{doc_id}"),
        score,
        metadata,
    }
}

struct FixedEmbedder {
    fail: bool,
}

impl EmbeddingsProvider for FixedEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                Err(RagError::Embedding("embedder offline".into()))
            } else {
                Ok(vec![0.1, 0.2, 0.3])
            }
        })
    }
}

/// Returns its scripted hits for any vector, honouring `k` and the threshold.
pub struct ScriptedIndex {
    name: &'static str,
    hits: Vec<RetrievalHit>,
    fail: bool,
}

impl ScriptedIndex {
    pub fn new(name: &'static str, hits: Vec<RetrievalHit>) -> Self {
        Self {
            name,
            hits,
            fail: false,
        }
    }
}

impl SimilarityIndex for ScriptedIndex {
    fn query<'a>(
        &'a self,
        _vector: &'a [f32],
        k: u64,
        score_threshold: Option<f32>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                return Err(RagError::Qdrant(format!("{} unavailable", self.name)));
            }
            Ok(self
                .hits
                .iter()
                .filter(|h| score_threshold.is_none_or(|t| h.score >= t))
                .take(k as usize)
                .cloned()
                .collect())
        })
    }

    fn count<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<u64, RagError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                Err(RagError::Qdrant(format!("{} unavailable", self.name)))
            } else {
                Ok(self.hits.len() as u64)
            }
        })
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[derive(Clone, Debug)]
pub enum GenBehavior {
    Reply(String),
    Fail,
    Hang,
}

pub struct ScriptedGenerator {
    behavior: GenBehavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl GenerationProvider for ScriptedGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, EngineError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Box::pin(async move {
            match &self.behavior {
                GenBehavior::Reply(text) => Ok(text.clone()),
                GenBehavior::Fail => Err(EngineError::Config("generator offline".into())),
                GenBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        })
    }
}

/// Engine context plus handles to inspect the fake generator.
pub struct TestContext {
    pub ctx: EngineContext,
    scripted: Arc<ScriptedGenerator>,
}

impl TestContext {
    pub fn generation_calls(&self) -> usize {
        self.scripted.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.scripted.prompts.lock().unwrap().clone()
    }
}

impl Deref for TestContext {
    type Target = EngineContext;

    fn deref(&self) -> &EngineContext {
        &self.ctx
    }
}

pub struct ContextBuilder {
    config: EngineConfig,
    faq_hits: Vec<RetrievalHit>,
    doc_hits: Vec<RetrievalHit>,
    embedder_fails: bool,
    faq_fails: bool,
    doc_fails: bool,
    behavior: GenBehavior,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            faq_hits: Vec::new(),
            doc_hits: Vec::new(),
            embedder_fails: false,
            faq_fails: false,
            doc_fails: false,
            behavior: GenBehavior::Reply("generated answer".into()),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn faq_hits(mut self, hits: Vec<RetrievalHit>) -> Self {
        self.faq_hits = hits;
        self
    }

    pub fn doc_hits(mut self, hits: Vec<RetrievalHit>) -> Self {
        self.doc_hits = hits;
        self
    }

    pub fn failing_embedder(mut self) -> Self {
        self.embedder_fails = true;
        self
    }

    pub fn failing_faq_index(mut self) -> Self {
        self.faq_fails = true;
        self
    }

    pub fn failing_doc_index(mut self) -> Self {
        self.doc_fails = true;
        self
    }

    pub fn generator(mut self, behavior: GenBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn build(self) -> TestContext {
        let scripted = Arc::new(ScriptedGenerator {
            behavior: self.behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        });

        let mut faq = ScriptedIndex::new("faq_index", self.faq_hits);
        faq.fail = self.faq_fails;
        let mut docs = ScriptedIndex::new("doc_index", self.doc_hits);
        docs.fail = self.doc_fails;

        let ctx = EngineContext::new(
            self.config,
            Arc::new(FixedEmbedder {
                fail: self.embedder_fails,
            }),
            Arc::new(faq),
            Arc::new(docs),
            scripted.clone(),
        );

        TestContext { ctx, scripted }
    }
}
