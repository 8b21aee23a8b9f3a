use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

/// A document slated for chunking: file stem becomes the chunk `source`.
#[derive(Debug, Clone)]
pub struct DocFile {
    pub source: String,
    pub path: PathBuf,
}

// Find candidate .txt documents under input_dir, sorted by path.
// Mirrors the doc selection step in front of the chunk loop.
pub fn select_docs(input_dir: &Path, source: Option<&str>) -> Result<Vec<DocFile>> {
    if !input_dir.is_dir() {
        bail!("input directory not found: {}", input_dir.display());
    }

    let mut docs: Vec<DocFile> = Vec::new();
    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", input_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(wanted) = source {
            if stem != wanted {
                continue;
            }
        }
        docs.push(DocFile {
            source: stem.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(docs)
}
