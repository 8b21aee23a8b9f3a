use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Chunk;

#[derive(Copy, Clone, Debug)]
pub enum Phase {
    Plan,
    ScanDocs,
    LoadTokenizer,
    ChunkDoc,
    WriteChunks,
}

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Plan => "plan",
            Phase::ScanDocs => "scan_docs",
            Phase::LoadTokenizer => "load_tokenizer",
            Phase::ChunkDoc => "chunk_doc",
            Phase::WriteChunks => "write_chunks",
        }
    }
    fn span(&self) -> Span {
        match self {
            Phase::Plan => info_span!("plan"),
            Phase::ScanDocs => info_span!("scan_docs"),
            Phase::LoadTokenizer => info_span!("load_tokenizer"),
            Phase::ChunkDoc => info_span!("chunk_doc"),
            Phase::WriteChunks => info_span!("write_chunks"),
        }
    }
}

impl OpMarker for Chunk {
    const NAME: &'static str = "chunk";
    type Phase = Phase;
    fn root_span() -> Span {
        info_span!("chunk")
    }
}
