use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::Chunk;

// One file per document, one JSON object per line, in emission order.
pub fn write_chunks(out_dir: &Path, source: &str, chunks: &[Chunk]) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    let path = out_dir.join(format!("{source}.jsonl"));
    let file =
        File::create(&path).with_context(|| format!("create chunk file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for chunk in chunks {
        serde_json::to_writer(&mut out, chunk)?;
        writeln!(&mut out)?;
    }
    out.flush()
        .with_context(|| format!("flush chunk file {}", path.display()))?;
    Ok(path)
}
