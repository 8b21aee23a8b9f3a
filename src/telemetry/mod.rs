pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

// Factory helpers, one per op
pub fn chunk() -> LogCtx<ops::chunk::Chunk> {
    ctx::new_ctx()
}
pub fn stats() -> LogCtx<ops::stats::Stats> {
    ctx::new_ctx()
}
