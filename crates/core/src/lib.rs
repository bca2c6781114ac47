//! Linear concurrent pipelines: a source, transform stages and a sink, each
//! running as its own task and connected by handoff channels.
//!
//! Every stage joins a [`StageGroup`](pipeline::StageGroup) when it is
//! launched and leaves it once it has closed its output, so waiting on the
//! group waits for the whole pipeline to drain.

pub mod config;
pub mod error;
pub mod functions;
pub mod orchestrator;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod test_utils;

pub use error::{PipelineError, Result};
