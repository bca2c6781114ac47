use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Number of items the generator emits.
pub const ITEM_COUNT: usize = 10;
/// Factor applied by the scaling stage.
pub const MULTIPLIER: i64 = 2;
/// Per-item delay of the scaling stage.
pub const STAGE_DELAY: Duration = Duration::from_millis(10);
/// Buffered slots per channel. Zero makes every channel a handoff.
pub const CHANNEL_CAPACITY: usize = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub item_count: usize,
    pub multiplier: i64,
    pub stage_delay: Duration,
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            item_count: ITEM_COUNT,
            multiplier: MULTIPLIER,
            stage_delay: STAGE_DELAY,
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

impl PipelineConfig {
    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_stage_delay(mut self, stage_delay: Duration) -> Self {
        self.stage_delay = stage_delay;
        self
    }

    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    /// Stages of the full pipeline: square, then scale after a delay.
    pub fn stages(&self) -> Vec<StageSpec> {
        vec![StageSpec::square(), StageSpec::scale(self.multiplier).with_delay(self.stage_delay)]
    }

    /// Stages of the short pipeline: square only.
    pub fn short_stages(&self) -> Vec<StageSpec> {
        vec![StageSpec::square()]
    }
}

/// Function applied by a transform stage.
pub type StageFn = Arc<dyn Fn(i64) -> i64 + Send + Sync>;

/// Description of one transform stage: a name, the function it applies and
/// an optional per-item delay.
#[derive(Clone)]
pub struct StageSpec {
    pub name: String,
    pub transform: StageFn,
    pub delay: Option<Duration>,
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .finish()
    }
}

impl StageSpec {
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        StageSpec {
            name: name.into(),
            transform: Arc::new(transform),
            delay: None,
        }
    }

    /// `x * x`, wrapping on overflow.
    pub fn square() -> Self {
        Self::new("square", |x: i64| x.wrapping_mul(x))
    }

    /// `x * factor`, wrapping on overflow.
    pub fn scale(factor: i64) -> Self {
        Self::new("scale", move |x: i64| x.wrapping_mul(factor))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn apply(&self, x: i64) -> i64 {
        (self.transform)(x)
    }
}
