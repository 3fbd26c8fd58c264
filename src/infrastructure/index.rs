use crate::domain::errors::ArtifactError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// One historical row rendered to text plus its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Embedding-indexed projection of the historical dataset. Built once,
/// read-only at inference time; rebuilt wholesale when the dataset changes.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    documents: Vec<IndexedDocument>,
}

impl VectorIndex {
    pub fn from_documents(documents: Vec<IndexedDocument>) -> Self {
        Self { documents }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::IndexUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let index: VectorIndex =
            serde_json::from_reader(file).map_err(|e| ArtifactError::IndexUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if index.documents.is_empty() {
            return Err(ArtifactError::IndexUnavailable {
                path: path.to_path_buf(),
                reason: "index snapshot contains no documents".to_string(),
            });
        }

        info!(
            "Loaded vector index ({} documents) from {:?}",
            index.documents.len(),
            path
        );
        Ok(index)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        info!(
            "Saved vector index ({} documents) to {:?}",
            self.documents.len(),
            path
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Nearest neighbors of the query embedding by cosine similarity,
    /// most similar first. Returns fewer than `k` when the index is small.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<&IndexedDocument> {
        let mut scored: Vec<(f32, &IndexedDocument)> = self
            .documents
            .iter()
            .map(|doc| (cosine_similarity(query, &doc.embedding), doc))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(k).map(|(_, doc)| doc).collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
