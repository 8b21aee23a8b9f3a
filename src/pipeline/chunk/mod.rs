pub mod logic;
pub mod select;
pub mod types;
pub mod write;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::{self, ChunkingConfig};
use crate::telemetry::{self};
use crate::telemetry::ops::chunk::Phase as ChunkPhase;
use crate::tokenizer::{HfTokenizer, Tokenize};

use self::logic::{ChunkError, chunk_text, validate_params};
use self::select::{DocFile, select_docs};

#[derive(Args)]
pub struct ChunkCmd {
    /// Directory of cleaned .txt documents
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Directory receiving one <source>.jsonl per document
    #[arg(long)]
    pub out_dir: PathBuf,
    /// YAML config with chunk_size / chunk_overlap / tokenizer_name
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured window size (tokens)
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Override the configured window overlap (tokens)
    #[arg(long)]
    pub overlap: Option<usize>,
    /// Override the configured tokenizer name
    #[arg(long)]
    pub tokenizer: Option<String>,
    /// Restrict to a single source (file stem)
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long, default_value_t = false)]
    pub apply: bool,
    #[arg(long, default_value_t = 10)]
    pub plan_limit: usize,
}

#[derive(Debug, Serialize)]
pub struct DocResult {
    pub source: String,
    pub chunks: usize,
    pub tokens: usize,
}

pub fn run(args: ChunkCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::chunk();
    let _g = log
        .root_span_kv([
            ("input_dir", args.input_dir.display().to_string()),
            ("out_dir", args.out_dir.display().to_string()),
            ("config", format!("{:?}", args.config)),
            ("chunk_size", format!("{:?}", args.chunk_size)),
            ("overlap", format!("{:?}", args.overlap)),
            ("tokenizer", format!("{:?}", args.tokenizer)),
            ("source", format!("{:?}", args.source)),
            ("apply", args.apply.to_string()),
            ("plan_limit", args.plan_limit.to_string()),
        ])
        .entered();

    let cfg = resolve_config(&args)?;
    validate_params(cfg.chunk_size, cfg.chunk_overlap)?;

    let _s = log.span(&ChunkPhase::ScanDocs).entered();
    let docs = select_docs(&args.input_dir, args.source.as_deref())?;
    drop(_s);
    if docs.is_empty() {
        log.info(format!(
            "ℹ️  No .txt documents found in {}{}",
            args.input_dir.display(),
            if args.source.is_some() { " (--source)" } else { "" }
        ));
        return Ok(());
    }

    if !args.apply {
        let _sp = log.span(&ChunkPhase::Plan).entered();
        log.info(format!(
            "📝 Chunk plan — docs={} chunk_size={} overlap={} tokenizer={}",
            docs.len(),
            cfg.chunk_size,
            cfg.chunk_overlap,
            cfg.tokenizer_name
        ));
        for doc in docs.iter().take(args.plan_limit) {
            log.info(format!("  {}", doc.source));
        }
        if docs.len() > args.plan_limit {
            log.info(format!("  ... ({} more)", docs.len() - args.plan_limit));
        }
        log.info("   Use --apply to execute.");
        if telemetry::config::json_mode() {
            #[derive(Serialize)]
            struct ChunkPlan {
                docs: usize,
                chunk_size: usize,
                chunk_overlap: usize,
                tokenizer_name: String,
                sample_sources: Vec<String>,
            }
            let sample_sources: Vec<String> = docs
                .iter()
                .take(args.plan_limit)
                .map(|d| d.source.clone())
                .collect();
            let plan = ChunkPlan {
                docs: docs.len(),
                chunk_size: cfg.chunk_size,
                chunk_overlap: cfg.chunk_overlap,
                tokenizer_name: cfg.tokenizer_name.clone(),
                sample_sources,
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let _s = log.span(&ChunkPhase::LoadTokenizer).entered();
    let tok = HfTokenizer::from_pretrained(&cfg.tokenizer_name)
        .with_context(|| format!("load tokenizer '{}'", cfg.tokenizer_name))?;
    drop(_s);

    let per_doc = chunk_docs(&docs, &cfg, &tok, &args.out_dir)?;

    if telemetry::config::json_mode() {
        #[derive(Serialize)]
        struct ChunkResult {
            docs: usize,
            chunks: usize,
            per_doc: Vec<DocResult>,
        }
        let chunks = per_doc.iter().map(|d| d.chunks).sum();
        let res = ChunkResult {
            docs: per_doc.len(),
            chunks,
            per_doc,
        };
        log.result(&res, t0.elapsed())?;
    }
    Ok(())
}

/// Chunk each selected document and write one JSONL file per source.
///
/// Failures are isolated per document: a doc that cannot be read, chunked,
/// or written is logged and skipped, and the rest of the batch proceeds.
pub fn chunk_docs<T: Tokenize>(
    docs: &[DocFile],
    cfg: &ChunkingConfig,
    tokenizer: &T,
    out_dir: &Path,
) -> Result<Vec<DocResult>> {
    let log = telemetry::chunk();
    validate_params(cfg.chunk_size, cfg.chunk_overlap)?;

    let mut per_doc: Vec<DocResult> = Vec::new();
    for doc in docs {
        let _sp = log.span(&ChunkPhase::ChunkDoc).entered();
        let text = match fs::read_to_string(&doc.path) {
            Ok(t) => t,
            Err(e) => {
                log.warn(format!("⚠️  {} — read failed, skipping: {}", doc.source, e));
                continue;
            }
        };
        if text.trim().is_empty() {
            log.info(format!("ℹ️  {} — empty document, skipping", doc.source));
            continue;
        }

        let chunks = match chunk_text(
            &text,
            cfg.chunk_size,
            cfg.chunk_overlap,
            tokenizer,
            &doc.source,
        ) {
            Ok(chunks) => chunks,
            // parameters were validated above; anything here is per-doc
            Err(ChunkError::InvalidParameter(msg)) => {
                return Err(ChunkError::InvalidParameter(msg).into());
            }
            Err(e) => {
                log.warn(format!("⚠️  {} — chunking failed, skipping: {}", doc.source, e));
                continue;
            }
        };
        drop(_sp);

        let tokens = chunks.last().map(|c| c.token_end).unwrap_or(0);

        let _wp = log.span(&ChunkPhase::WriteChunks).entered();
        let path = match write::write_chunks(out_dir, &doc.source, &chunks) {
            Ok(p) => p,
            Err(e) => {
                log.warn(format!("⚠️  {} — write failed, skipping: {}", doc.source, e));
                continue;
            }
        };
        drop(_wp);

        log.info(format!(
            "✅ {} → {} chunk(s) ({} tokens) → {}",
            doc.source,
            chunks.len(),
            tokens,
            path.display()
        ));
        per_doc.push(DocResult {
            source: doc.source.clone(),
            chunks: chunks.len(),
            tokens,
        });
    }
    Ok(per_doc)
}

fn resolve_config(args: &ChunkCmd) -> Result<ChunkingConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ChunkingConfig::default(),
    };
    if let Some(v) = args.chunk_size {
        cfg.chunk_size = v;
    }
    if let Some(v) = args.overlap {
        cfg.chunk_overlap = v;
    }
    if let Some(v) = &args.tokenizer {
        cfg.tokenizer_name = v.clone();
    }
    Ok(cfg)
}
