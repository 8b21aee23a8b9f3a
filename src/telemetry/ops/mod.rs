pub mod chunk;
pub mod stats;
