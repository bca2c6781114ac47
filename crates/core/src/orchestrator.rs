use crate::config::{PipelineConfig, StageSpec};
use crate::functions::Map;
use crate::pipeline::{PipelineTask, SinkComponent, StageGroup};
use crate::sources::RangeSource;
use std::sync::Arc;
use tracing::info;

fn stage_for(spec: &StageSpec) -> Map<i64, i64> {
    let transform = Arc::clone(&spec.transform);
    let map = Map::new(spec.name.clone(), move |x: i64| transform(x));
    match spec.delay {
        Some(delay) => map.with_delay(delay),
        None => map,
    }
}

/// Wires `generate -> stages... -> sink` into `group` and returns once every
/// stage has been launched. Callers wait on `group` for the data to drain.
pub fn orchestrate_stages<K>(
    group: &StageGroup,
    pipeline: &str,
    item_count: usize,
    stages: &[StageSpec],
    channel_capacity: usize,
    sink: K,
) where
    K: SinkComponent<Input = i64>,
{
    let source = PipelineTask::source(group, pipeline, channel_capacity, RangeSource::new(item_count));
    let tail = stages.iter().fold(source, |task, spec| task | stage_for(spec));
    tail.sink(sink);

    info!(
        "Pipeline {} launched with {} transform stages over {} items",
        pipeline,
        stages.len(),
        item_count
    );
}

/// generate -> square -> scale (delayed) -> sink
pub fn orchestrate<K>(group: &StageGroup, config: &PipelineConfig, sink: K)
where
    K: SinkComponent<Input = i64>,
{
    orchestrate_stages(group, "full", config.item_count, &config.stages(), config.channel_capacity, sink);
}

/// generate -> square -> sink
pub fn orchestrate_short<K>(group: &StageGroup, config: &PipelineConfig, sink: K)
where
    K: SinkComponent<Input = i64>,
{
    orchestrate_stages(group, "short", config.item_count, &config.short_stages(), config.channel_capacity, sink);
}
