//! TraceVis-RS - Demo Entry Point
//!
//! Rasterizes a synthetic trace with the configured render settings and logs
//! a summary of the run.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracevis_rs::{
    config::{ensure_app_data_dir, render_config_path, RenderConfig, ViewportAttributes},
    error::ResultExt,
    pipeline::{LineTable, PipelineSummary, ProgressTracker, RasterPipeline},
    raster::ViewSink,
    timeline::synthetic::{SyntheticPattern, SyntheticTrace},
    types::TimeWindow,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tracevis-rs")]
#[command(about = "Rasterize a synthetic execution trace into timeline spans", long_about = None)]
struct Args {
    /// Render config file (TOML or JSON); defaults to the app config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of timeline lines to synthesize
    #[arg(long, default_value_t = 64)]
    lines: usize,

    /// Samples per line
    #[arg(long, default_value_t = 20_000)]
    samples: usize,

    /// Horizontal resolution in pixels
    #[arg(long, default_value_t = 1920)]
    pixels: u32,

    /// Vertical scale in pixels per line
    #[arg(long, default_value_t = 12.0)]
    scale: f64,
}

/// Console logging, plus a daily log file when the data directory is usable
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tracevis_rs=debug"));

    match ensure_app_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tracevis.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            tracing::warn!("File logging disabled: {}", e);
            None
        }
    }
}

fn run(args: &Args) -> tracevis_rs::Result<PipelineSummary> {
    let config = match args.config.as_ref() {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load render config {:?}", path))?,
        None => render_config_path()
            .map(RenderConfig::load_or_default)
            .unwrap_or_default(),
    };

    let trace = SyntheticTrace::new(args.lines, args.samples)
        .with_pattern(SyntheticPattern::Phased { period: 400 });
    let (database, call_paths) = trace.build();
    tracing::info!(
        lines = args.lines,
        samples = database.total_samples(),
        "Synthesized trace"
    );

    let viewport = ViewportAttributes::from_config(
        &config,
        TimeWindow::new(0, trace.duration()),
        args.pixels,
        args.scale,
    );

    let tracker = Arc::new(ProgressTracker::new(args.lines as u64));
    let detail = config.detail_sample_counts;
    let handle = RasterPipeline::from_config(&config, viewport)
        .spawn(
            Arc::new(database),
            Arc::new(call_paths),
            move |_| ViewSink::new(detail),
            Arc::clone(&tracker),
        )
        .context("Failed to start raster pipeline")?;

    let table = LineTable::from_receiver(handle.results(), args.lines);
    let summary = handle.join().context("Raster pipeline failed")?;

    let spans: usize = table.iter().map(|line| line.spans().len()).sum();
    let height: i64 = table.iter().map(|line| line.height.max(0) as i64).sum();

    tracing::info!(
        lines = table.filled(),
        spans,
        height_px = height,
        invalid = summary.total_invalid_samples,
        invalid_ratio = summary.invalid_ratio(),
        canceled = summary.was_canceled,
        "Render complete ({:.0}% of lines)",
        tracker.fraction() * 100.0
    );

    Ok(summary)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();

    tracing::info!("Starting TraceVis-RS");
    run(&args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracevis_rs::TraceVisError;

    fn small_args(extra: &[&str]) -> Args {
        let mut argv = vec!["tracevis-rs", "--lines=4", "--samples", "200", "--pixels=50"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["tracevis-rs"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.lines, 64);
        assert_eq!(args.samples, 20_000);
        assert_eq!(args.pixels, 1920);
        assert_eq!(args.scale, 12.0);
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["tracevis-rs", "--lines", "many"]).is_err());
        assert!(Args::try_parse_from(["tracevis-rs", "--pixels=-3"]).is_err());
        assert!(Args::try_parse_from(["tracevis-rs", "--unknown"]).is_err());
    }

    #[test]
    fn test_run_renders_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "workers = 2\n").unwrap();
        let args = small_args(&["--config", path.to_str().unwrap()]);

        let summary = run(&args).unwrap();
        assert_eq!(summary.lines_published, 4);
        assert_eq!(summary.workers, 2);
        assert!(!summary.was_canceled);
    }

    #[test]
    fn test_run_wraps_config_errors_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "queue_capacity = 0\n").unwrap();
        let args = small_args(&["--config", path.to_str().unwrap()]);

        let err = run(&args).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load render config"));
        match err {
            TraceVisError::WithContext { source, .. } => {
                assert!(matches!(*source, TraceVisError::Config(_)))
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
