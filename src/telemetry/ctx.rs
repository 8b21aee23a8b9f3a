use std::marker::PhantomData;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{Span, debug, info, warn};

use super::{config, emit};

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

/// Per-op logging context: spans for the op's phases plus the stdout
/// plan/result envelopes.
pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str {
        O::NAME
    }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = O::root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span {
        if self.json {
            debug!(op = %self.op_name(), phase = ph.name(), "phase");
        }
        ph.span()
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.json {
            info!(op = %self.op_name(), "{}", msg.as_ref());
        } else {
            info!("{}", msg.as_ref());
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.json {
            warn!(op = %self.op_name(), "{}", msg.as_ref());
        } else {
            warn!("{}", msg.as_ref());
        }
    }

    pub fn plan<T: Serialize>(&self, plan: &T) -> Result<()> {
        emit::print_plan(self.op_name(), plan)
    }

    pub fn result<T: Serialize>(&self, result: &T, elapsed: Duration) -> Result<()> {
        emit::print_result(
            self.op_name(),
            result,
            emit::Meta {
                duration_ms: elapsed.as_millis(),
            },
        )
    }
}

pub(crate) fn new_ctx<O: OpMarker>() -> LogCtx<O> {
    LogCtx {
        json: config::logs_are_json(),
        _marker: PhantomData,
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv {
        parts.push(format!("{}={}", k, v));
    }
    parts.join(" ")
}
