use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Stats;

#[derive(Copy, Clone, Debug)]
pub enum Phase {
    ScanFiles,
    Summarize,
}

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::ScanFiles => "scan_files",
            Phase::Summarize => "summarize",
        }
    }
    fn span(&self) -> Span {
        match self {
            Phase::ScanFiles => info_span!("scan_files"),
            Phase::Summarize => info_span!("summarize"),
        }
    }
}

impl OpMarker for Stats {
    const NAME: &'static str = "stats";
    type Phase = Phase;
    fn root_span() -> Span {
        info_span!("stats")
    }
}
