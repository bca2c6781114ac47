use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failures a stage can hit while running.
///
/// None of these are forwarded to other stages. The stage runner logs them
/// and records them in the [`StageGroup`](crate::pipeline::StageGroup).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage `{stage}` lost its downstream receiver")]
    Disconnected { stage: String },

    #[error("failed to render output: {0}")]
    Render(#[from] io::Error),

    #[error("stage `{stage}` panicked")]
    StagePanicked { stage: String },

    #[error("stages still outstanding after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
