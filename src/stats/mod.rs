use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use walkdir::WalkDir;

use crate::pipeline::chunk::types::Chunk;
use crate::telemetry::{self};
use crate::telemetry::ops::stats::Phase as StatsPhase;

#[derive(Args, Debug)]
pub struct StatsCmd {
    /// Directory of <source>.jsonl chunk files
    #[arg(long)]
    pub chunks_dir: PathBuf,
    /// Restrict to a single source
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Serialize)]
pub struct SourceStats {
    pub source: String,
    pub chunks: usize,
    pub tokens_min: usize,
    pub tokens_max: usize,
    pub tokens_avg: f64,
    /// Characters of the original document covered by the chunk ranges
    pub char_span: usize,
    pub malformed_lines: usize,
}

#[derive(Serialize)]
pub struct StatsSummary {
    pub sources: usize,
    pub chunks: usize,
    pub per_source: Vec<SourceStats>,
}

pub fn run(args: StatsCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::stats();
    let _g = log
        .root_span_kv([
            ("chunks_dir", args.chunks_dir.display().to_string()),
            ("source", format!("{:?}", args.source)),
        ])
        .entered();

    let _s = log.span(&StatsPhase::ScanFiles).entered();
    let files = chunk_files(&args.chunks_dir, args.source.as_deref())?;
    drop(_s);
    if files.is_empty() {
        log.info(format!(
            "ℹ️  No chunk files found in {}",
            args.chunks_dir.display()
        ));
        return Ok(());
    }

    let _s = log.span(&StatsPhase::Summarize).entered();
    let mut per_source: Vec<SourceStats> = Vec::new();
    for (source, path) in files {
        per_source.push(source_stats(&source, &path)?);
    }
    drop(_s);

    for s in &per_source {
        log.info(format!(
            "🧩 {} — chunks={} tokens(min/avg/max)={}/{:.1}/{} char_span={}{}",
            s.source,
            s.chunks,
            s.tokens_min,
            s.tokens_avg,
            s.tokens_max,
            s.char_span,
            if s.malformed_lines > 0 {
                format!(" malformed={}", s.malformed_lines)
            } else {
                String::new()
            }
        ));
    }

    let chunks = per_source.iter().map(|s| s.chunks).sum();
    let summary = StatsSummary {
        sources: per_source.len(),
        chunks,
        per_source,
    };
    log.info(format!(
        "📊 Totals — sources={} chunks={}",
        summary.sources, summary.chunks
    ));

    if telemetry::config::json_mode() {
        log.result(&summary, t0.elapsed())?;
    }
    Ok(())
}

fn chunk_files(chunks_dir: &Path, source: Option<&str>) -> Result<Vec<(String, PathBuf)>> {
    if !chunks_dir.is_dir() {
        bail!("chunks directory not found: {}", chunks_dir.display());
    }
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(chunks_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", chunks_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
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
        files.push((stem.to_string(), path.to_path_buf()));
    }
    Ok(files)
}

fn source_stats(source: &str, path: &Path) -> Result<SourceStats> {
    let file = File::open(path).with_context(|| format!("open chunk file {}", path.display()))?;

    let mut chunks = 0usize;
    let mut malformed = 0usize;
    let mut tokens_total = 0usize;
    let mut tokens_min = usize::MAX;
    let mut tokens_max = 0usize;
    let mut char_lo = usize::MAX;
    let mut char_hi = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("read chunk file {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Chunk>(&line) {
            Ok(c) => {
                let width = c.token_end.saturating_sub(c.token_start);
                chunks += 1;
                tokens_total += width;
                tokens_min = tokens_min.min(width);
                tokens_max = tokens_max.max(width);
                char_lo = char_lo.min(c.char_start);
                char_hi = char_hi.max(c.char_end);
            }
            Err(_) => malformed += 1,
        }
    }

    Ok(SourceStats {
        source: source.to_string(),
        chunks,
        tokens_min: if chunks == 0 { 0 } else { tokens_min },
        tokens_max,
        tokens_avg: if chunks == 0 {
            0.0
        } else {
            tokens_total as f64 / chunks as f64
        },
        char_span: char_hi.saturating_sub(if chunks == 0 { 0 } else { char_lo }),
        malformed_lines: malformed,
    })
}
