use std::ops::BitOr;
use tracing::{debug, info};
use crate::error::{PipelineError, Result};
use super::channel::{self, Receiver, Sender};
use super::message::Message;
use super::pipeline_component::{PipelineComponent, SinkComponent, SourceComponent};
use super::stage_group::{StageGroup, StageRegistration, StageState};

fn disconnected(registration: &StageRegistration) -> PipelineError {
    PipelineError::Disconnected {
        stage: registration.name().to_string(),
    }
}

fn close_output<T>(output: Sender<T>, registration: &mut StageRegistration) {
    let sent = output.close();
    registration.advance(StageState::Closed);
    debug!("{} completed after {} items", registration.name(), sent);
}

/// Launches `source` as stage `name` and returns the channel it writes to.
pub fn spawn_source<S>(group: &StageGroup, name: impl Into<String>, capacity: usize, mut source: S) -> Receiver<S::Output>
where
    S: SourceComponent,
{
    let name = name.into();
    let (output, receiver) = channel::with_source(name.clone(), capacity);

    group.spawn(name, move |registration| {
        debug!("{} starting, output capacity {:?}", registration.name(), output.capacity());
        let mut sequence = 0u64;

        let result = loop {
            let Some(item) = source.produce() else {
                registration.advance(StageState::Draining);
                break Ok(());
            };
            debug!("{} sending item {}", registration.name(), sequence);
            if output.send(Message::new(item, sequence)).is_err() {
                break Err(disconnected(registration));
            }
            sequence += 1;
        };

        close_output(output, registration);
        result
    });

    receiver
}

/// Launches `component` reading from `input` and returns the channel it
/// writes to. The output is closed once `input` is closed and drained.
pub fn spawn_stage<C>(
    group: &StageGroup,
    name: impl Into<String>,
    capacity: usize,
    input: Receiver<C::Input>,
    mut component: C,
) -> Receiver<C::Output>
where
    C: PipelineComponent,
{
    let name = name.into();
    let (output, receiver) = channel::with_source(name.clone(), capacity);

    group.spawn(name, move |registration| {
        debug!("{} starting, output capacity {:?}", registration.name(), output.capacity());

        let result = loop {
            let Ok(msg) = input.recv() else {
                registration.advance(StageState::Draining);
                break Ok(());
            };
            debug!("{} received item {}", registration.name(), msg.sequence);
            let transformed = msg.map(|item| component.process(item));
            if output.send(transformed).is_err() {
                break Err(disconnected(registration));
            }
        };

        debug!("{} read {} items", registration.name(), input.received());
        drop(input);
        close_output(output, registration);
        result
    });

    receiver
}

/// Launches `sink` reading from `input`. Sinks have no output channel.
pub fn spawn_sink<K>(group: &StageGroup, name: impl Into<String>, input: Receiver<K::Input>, mut sink: K)
where
    K: SinkComponent,
{
    group.spawn(name, move |registration| {
        debug!("{} starting", registration.name());

        let result = drain_into(&mut sink, &input, registration);

        if result.is_ok() {
            info!("{} finished after {} items", registration.name(), input.received());
        }
        registration.advance(StageState::Closed);
        result
    });
}

fn drain_into<K: SinkComponent>(sink: &mut K, input: &Receiver<K::Input>, registration: &mut StageRegistration) -> Result<()> {
    while let Ok(msg) = input.recv() {
        debug!("{} received item {}", registration.name(), msg.sequence);
        sink.consume(msg)?;
    }
    registration.advance(StageState::Draining);
    sink.finish()
}

/// Output end of a partially built pipeline.
///
/// Every stage is launched as soon as it is attached, so data starts
/// flowing before the pipeline is complete. Transforms are attached with
/// `|`, the terminal sink with [`PipelineTask::sink`].
///
/// ```ignore
/// let group = StageGroup::new();
/// PipelineTask::source(&group, "demo", 0, RangeSource::new(10))
///     | Map::new("square", |x: i64| x * x)
///     | Map::new("double", |x: i64| x * 2);
/// ```
pub struct PipelineTask<T> {
    group: StageGroup,
    pipeline: String,
    capacity: usize,
    output: Receiver<T>,
}

impl<T: Send + 'static> PipelineTask<T> {
    /// Starts a pipeline named `pipeline` whose channels all have `capacity`
    /// buffered slots.
    pub fn source<S>(group: &StageGroup, pipeline: impl Into<String>, capacity: usize, source: S) -> Self
    where
        S: SourceComponent<Output = T>,
    {
        let pipeline = pipeline.into();
        let name = format!("{}/{}", pipeline, source.name());
        let output = spawn_source(group, name, capacity, source);

        PipelineTask {
            group: group.clone(),
            pipeline,
            capacity,
            output,
        }
    }

    pub fn then<C>(self, component: C) -> PipelineTask<C::Output>
    where
        C: PipelineComponent<Input = T>,
    {
        let name = format!("{}/{}", self.pipeline, component.name());
        let output = spawn_stage(&self.group, name, self.capacity, self.output, component);

        PipelineTask {
            group: self.group,
            pipeline: self.pipeline,
            capacity: self.capacity,
            output,
        }
    }

    pub fn sink<K>(self, sink: K)
    where
        K: SinkComponent<Input = T>,
    {
        let name = format!("{}/{}", self.pipeline, sink.name());
        spawn_sink(&self.group, name, self.output, sink);
    }

    /// Hands the last channel to the caller instead of attaching a sink.
    pub fn into_receiver(self) -> Receiver<T> {
        self.output
    }
}

impl<T, C> BitOr<C> for PipelineTask<T>
where
    T: Send + 'static,
    C: PipelineComponent<Input = T>,
{
    type Output = PipelineTask<C::Output>;

    fn bitor(self, rhs: C) -> PipelineTask<C::Output> {
        self.then(rhs)
    }
}
