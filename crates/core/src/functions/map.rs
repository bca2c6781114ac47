use crate::pipeline::PipelineComponent;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// Applies a function to every item, optionally sleeping a fixed delay
/// before each one to simulate work.
pub struct Map<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    name: String,
    transform: Box<dyn Fn(I) -> O + Send + Sync>,
    delay: Option<Duration>,
    _phantom: PhantomData<fn(I) -> O>,
}

impl<I, O> Map<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Map {
            name: name.into(),
            transform: Box::new(transform),
            delay: None,
            _phantom: PhantomData,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay).filter(|d| !d.is_zero());
        self
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }
}

impl<I, O> PipelineComponent for Map<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, item: I) -> O {
        if let Some(delay) = self.delay {
            debug!("{} delaying {:?}", self.name, delay);
            std::thread::sleep(delay);
        }
        (self.transform)(item)
    }
}
