//! High-level recipe operations, one per CLI command.

pub mod pipeline;

pub use pipeline::{PipelineOptions, PipelineOutcome};
