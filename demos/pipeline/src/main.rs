use stagewire::{
    config::PipelineConfig,
    orchestrator::{orchestrate, orchestrate_short},
    pipeline::StageGroup,
    sinks::PrinterSink,
};
use tracing::info;

/**
 * Runs two pipelines side by side on one stage group and waits for both:
 *
 *   generate -> square -> scale (10ms per item) -> print
 *   generate -> square -> print
 */
#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout only carries rendered items.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig::default();
    let group = StageGroup::new();

    orchestrate(&group, &config, PrinterSink::stdout());
    orchestrate_short(&group, &config, PrinterSink::stdout());

    info!("Waiting for {} stages to drain...", group.outstanding());
    group.wait().await;

    info!("All pipelines completed ({} stages, {} failed)", group.launched(), group.failed());
}
