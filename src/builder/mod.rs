//! Build orchestration: toolchain generation and the configure cycle.

pub mod orchestrator;
pub mod swap;
pub mod toolchain;

pub use orchestrator::BuildOrchestrator;
pub use swap::{DescriptorSwap, SourceTreeLock};
pub use toolchain::{ToolchainFiles, ToolchainGenerator};
