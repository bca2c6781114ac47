use stagewire::config::PipelineConfig;
use stagewire::functions::Map;
use stagewire::orchestrator::{orchestrate, orchestrate_short};
use stagewire::pipeline::{Message, PipelineTask, SinkComponent, SourceComponent, StageGroup};
use stagewire::sinks::PrinterSink;
use stagewire::sources::RangeSource;
use stagewire::test_utils::{NumberCollector, SharedBuffer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WAIT_LIMIT: Duration = Duration::from_secs(10);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn fast_config() -> PipelineConfig {
    PipelineConfig::default().with_stage_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn test_full_pipeline_renders_expected_lines() {
    init_tracing();
    let group = StageGroup::new();
    let buffer = SharedBuffer::new();

    orchestrate(&group, &PipelineConfig::default(), PrinterSink::new(buffer.clone()));
    group.wait_timeout(WAIT_LIMIT).await.unwrap();

    let expected: Vec<String> = [0, 2, 8, 18, 32, 50, 72, 98, 128, 162]
        .iter()
        .map(|n| format!("Processed output: {}", n))
        .collect();
    assert_eq!(buffer.lines(), expected);
    assert_eq!(group.failed(), 0);
}

#[tokio::test]
async fn test_short_pipeline_renders_squares() {
    let group = StageGroup::new();
    let buffer = SharedBuffer::new();

    orchestrate_short(&group, &PipelineConfig::default(), PrinterSink::new(buffer.clone()));
    group.wait_timeout(WAIT_LIMIT).await.unwrap();

    let expected: Vec<String> = [0, 1, 4, 9, 16, 25, 36, 49, 64, 81]
        .iter()
        .map(|n| format!("Processed output: {}", n))
        .collect();
    assert_eq!(buffer.lines(), expected);
}

#[tokio::test]
async fn test_item_count_matches_output_count() {
    for count in [0usize, 1, 7, 25] {
        let group = StageGroup::new();
        let collector = NumberCollector::new();
        let results = collector.results.clone();

        orchestrate(&group, &fast_config().with_item_count(count), collector);
        group.wait_timeout(WAIT_LIMIT).await.unwrap();

        let expected: Vec<i64> = (0..count as i64).map(|i| i * i * 2).collect();
        assert_eq!(results.payloads(), expected, "item count {}", count);
    }
}

#[tokio::test]
async fn test_order_follows_generator_order() {
    let group = StageGroup::new();
    let collector = NumberCollector::new();
    let results = collector.results.clone();

    orchestrate(&group, &fast_config().with_item_count(40), collector);
    group.wait_timeout(WAIT_LIMIT).await.unwrap();

    let sequences = results.sequences();
    assert_eq!(sequences, (0..40).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_both_variants_share_one_group() {
    init_tracing();
    let group = StageGroup::new();
    let full = NumberCollector::new();
    let short = NumberCollector::new();
    let full_results = full.results.clone();
    let short_results = short.results.clone();

    let config = PipelineConfig::default();
    orchestrate(&group, &config, full);
    orchestrate_short(&group, &config, short);

    // Both are launched before anyone waits.
    assert_eq!(group.launched(), 7);

    group.wait_timeout(WAIT_LIMIT).await.unwrap();
    assert_eq!(group.outstanding(), 0);
    assert_eq!(full_results.payloads(), vec![0, 2, 8, 18, 32, 50, 72, 98, 128, 162]);
    assert_eq!(short_results.payloads(), vec![0, 1, 4, 9, 16, 25, 36, 49, 64, 81]);
}

#[tokio::test]
async fn test_buffered_channels_give_same_results() {
    let group = StageGroup::new();
    let collector = NumberCollector::new();
    let results = collector.results.clone();

    orchestrate(&group, &fast_config().with_channel_capacity(4), collector);
    group.wait_timeout(WAIT_LIMIT).await.unwrap();

    assert_eq!(results.payloads(), vec![0, 2, 8, 18, 32, 50, 72, 98, 128, 162]);
}

#[tokio::test]
async fn test_slow_stage_throttles_pipeline() {
    let count = 10;
    let mut elapsed = Vec::new();
    let mut outputs = Vec::new();

    for delay_ms in [5u64, 30] {
        let delay = Duration::from_millis(delay_ms);
        let group = StageGroup::new();
        let collector = NumberCollector::new();
        let results = collector.results.clone();

        let started = Instant::now();
        orchestrate(
            &group,
            &PipelineConfig::default().with_item_count(count).with_stage_delay(delay),
            collector,
        );
        group.wait_timeout(WAIT_LIMIT).await.unwrap();
        let took = started.elapsed();

        assert!(took >= delay * count as u32, "{:?} < {:?}", took, delay * count as u32);
        elapsed.push(took);
        outputs.push(results.payloads());
    }

    assert!(elapsed[1] > elapsed[0]);
    assert_eq!(outputs[0], outputs[1]);
}

struct CountingSource {
    inner: RangeSource,
    produced: Arc<AtomicUsize>,
}

impl SourceComponent for CountingSource {
    type Output = i64;

    fn name(&self) -> &str {
        "counting"
    }

    fn produce(&mut self) -> Option<i64> {
        let item = self.inner.produce()?;
        self.produced.fetch_add(1, Ordering::SeqCst);
        Some(item)
    }
}

struct SlowSink {
    consumed: Arc<AtomicUsize>,
    delay: Duration,
}

impl SinkComponent for SlowSink {
    type Input = i64;

    fn name(&self) -> &str {
        "slow"
    }

    fn consume(&mut self, _msg: Message<i64>) -> stagewire::Result<()> {
        self.consumed.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        Ok(())
    }
}

#[tokio::test]
async fn test_handoff_bounds_how_far_producer_runs_ahead() {
    let group = StageGroup::new();
    let produced = Arc::new(AtomicUsize::new(0));
    let consumed = Arc::new(AtomicUsize::new(0));

    let source = CountingSource {
        inner: RangeSource::new(20),
        produced: produced.clone(),
    };
    PipelineTask::source(&group, "throttled", 0, source)
        .then(Map::new("identity", |x: i64| x))
        .sink(SlowSink {
            consumed: consumed.clone(),
            delay: Duration::from_millis(20),
        });

    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let produced = produced.load(Ordering::SeqCst);
        let consumed = consumed.load(Ordering::SeqCst);
        // Items held by the sink, the map and the source, plus one the sink
        // has received but not yet counted.
        assert!(produced <= consumed + 3, "produced {} consumed {}", produced, consumed);
    }

    group.wait_timeout(WAIT_LIMIT).await.unwrap();
    assert_eq!(consumed.load(Ordering::SeqCst), 20);
}

#[tokio::test]
async fn test_wait_reports_hang_as_timeout() {
    let group = StageGroup::new();
    let stalled = (PipelineTask::source(&group, "stalled", 0, RangeSource::new(3))
        | Map::new("square", |x: i64| x * x))
    .into_receiver();

    // Nobody reads `stalled`, so the pipeline cannot drain.
    let err = group.wait_timeout(Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, stagewire::PipelineError::Timeout(_)));
    assert!(group.outstanding() > 0);

    drop(stalled);
    group.wait_timeout(WAIT_LIMIT).await.unwrap();
    assert_eq!(group.outstanding(), 0);
}
