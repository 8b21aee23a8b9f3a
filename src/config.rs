use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Chunking parameters, typically loaded from a `chunking.yaml`.
/// Missing fields fall back to the stage defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_tokenizer_name")]
    pub tokenizer_name: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            tokenizer_name: default_tokenizer_name(),
        }
    }
}

fn default_chunk_size() -> usize {
    350
}

fn default_chunk_overlap() -> usize {
    80
}

fn default_tokenizer_name() -> String {
    "bert-base-cased".to_string()
}

pub fn load_config(path: &Path) -> Result<ChunkingConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ChunkingConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
