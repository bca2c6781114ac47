use crate::error::Result;
use super::message::Message;

/// First stage of a pipeline. Has no input channel.
pub trait SourceComponent: Send + 'static {
    type Output: Send + 'static;

    fn name(&self) -> &str;

    /// Next item to emit, or `None` once the sequence is exhausted.
    fn produce(&mut self) -> Option<Self::Output>;
}

/// Middle stage: turns every input item into exactly one output item.
pub trait PipelineComponent: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    fn name(&self) -> &str;

    fn process(&mut self, item: Self::Input) -> Self::Output;
}

/// Last stage of a pipeline. Has no output channel.
pub trait SinkComponent: Send + 'static {
    type Input: Send + 'static;

    fn name(&self) -> &str;

    fn consume(&mut self, item: Message<Self::Input>) -> Result<()>;

    /// Called once after the input is drained.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
