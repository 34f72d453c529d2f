//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! crate decoupled from `qdrant-client`.

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
    point_id::PointIdOptions, vectors_config::Config as VectorsConfigKind,
};
use tracing::{debug, info, warn};

/// One raw search result: point id, similarity score, JSON payload.
#[derive(Clone, Debug)]
pub struct ScoredPayload {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Vector parameters of an existing collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionVectors {
    pub size: u64,
    pub distance: Option<DistanceKind>,
}

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// # Errors
    /// [`RagError::Config`] for invalid config, [`RagError::Qdrant`] if the
    /// client cannot be built.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Whether the collection exists.
    pub async fn exists(&self) -> Result<bool, RagError> {
        self.client
            .collection_exists(self.collection.as_str())
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))
    }

    /// Reads the single-vector parameters of the collection, if it has them.
    pub async fn vector_params(&self) -> Result<Option<CollectionVectors>, RagError> {
        let info = self
            .client
            .collection_info(self.collection.as_str())
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let params = info
            .result
            .and_then(|i| i.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config);

        Ok(match params {
            Some(VectorsConfigKind::Params(p)) => Some(CollectionVectors {
                size: p.size,
                distance: distance_from_raw(p.distance),
            }),
            _ => None,
        })
    }

    /// Ensures that the collection exists.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the given vector space configuration.
    pub async fn ensure_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, space.size, space.distance
        );

        if self.exists().await? {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        self.create(space).await
    }

    /// Drops the collection (if present) and creates it again empty.
    pub async fn recreate_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        if self.exists().await? {
            warn!("Dropping collection '{}' before rebuild", self.collection);
            self.client
                .delete_collection(self.collection.as_str())
                .await
                .map_err(|e| RagError::Qdrant(e.to_string()))?;
        }
        self.create(space).await
    }

    async fn create(&self, space: &VectorSpace) -> Result<(), RagError> {
        let distance = match space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Distance configured for newly created collections.
    pub fn distance(&self) -> DistanceKind {
        self.distance
    }

    /// Upserts a batch of points and waits until they are searchable.
    ///
    /// Returns the number of points sent.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<u64, RagError> {
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(0);
        }

        let n = points.len() as u64;
        debug!("Upserting {} points into collection '{}'", n, self.collection);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(n)
    }

    /// Exact number of stored points.
    pub async fn count(&self) -> Result<u64, RagError> {
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;
        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }

    /// Performs a similarity search; results are sorted by descending score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        score_threshold: Option<f32>,
        exact: bool,
    ) -> Result<Vec<ScoredPayload>, RagError> {
        debug!(
            "Searching in '{}' with top_k={}, score_threshold={:?}, exact={}",
            self.collection, top_k, score_threshold, exact
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);

        if let Some(t) = score_threshold {
            builder = builder.score_threshold(t);
        }
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<ScoredPayload> = res
            .result
            .into_iter()
            .map(|r| ScoredPayload {
                id: r
                    .id
                    .and_then(|p| p.point_id_options)
                    .map(|o| match o {
                        PointIdOptions::Num(n) => n.to_string(),
                        PointIdOptions::Uuid(s) => s,
                    })
                    .unwrap_or_default(),
                score: r.score,
                payload: qpayload_to_json(r.payload),
            })
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

fn distance_from_raw(raw: i32) -> Option<DistanceKind> {
    if raw == Distance::Cosine as i32 {
        Some(DistanceKind::Cosine)
    } else if raw == Distance::Dot as i32 {
        Some(DistanceKind::Dot)
    } else if raw == Distance::Euclid as i32 {
        Some(DistanceKind::Euclid)
    } else {
        None
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into a JSON map.
fn qpayload_to_json(
    p: std::collections::HashMap<String, QValue>,
) -> serde_json::Map<String, serde_json::Value> {
    p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect()
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qvalue_to_json(v)))
                .collect(),
        ),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}
