//! Test to verify test infrastructure and configuration plumbing work correctly

mod common;

use common::builders::{TraceBuilder, ViewportBuilder};
use tempfile::TempDir;
use tracevis_rs::config::{RenderConfig, ViewportAttributes};
use tracevis_rs::pipeline::{PipelineSummary, RasterPipeline};
use tracevis_rs::types::{LineIndex, LineResult, PixelSpan, TimeWindow};
use tracevis_rs::TimelineProvider;

#[test]
fn test_infrastructure_setup() {
    let builder = TraceBuilder::new(3).samples_per_line(20);
    let vp = ViewportBuilder::new(0, builder.duration()).pixels(20).build();
    let db = builder.build();

    assert_eq!(db.line_count(), 3);
    assert_eq!(vp.pixel_length(), 10.0);
}

#[test]
#[should_panic]
fn test_overlapping_spans_are_caught() {
    let span = |start, end, id| PixelSpan {
        start,
        end,
        depth: id,
        color: common::test_color(id),
        sample_count: None,
    };
    let result = LineResult::new(LineIndex(0), 4, vec![span(0, 6, 1), span(5, 9, 2)]);
    common::assert_well_formed(&result, 10);
}

#[test]
fn test_invalid_ratio_of_a_partly_invalid_run() {
    let summary = PipelineSummary {
        total_invalid_samples: 3,
        total_valid_samples: 97,
        ..Default::default()
    };
    common::assert_float_eq(summary.invalid_ratio(), 0.03, 1e-12);
    common::assert_float_eq(PipelineSummary::default().invalid_ratio(), 0.0, 1e-12);
}

#[test]
fn test_render_config_json_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("render.json");
    std::fs::write(&path, r#"{ "workers": 2, "detail_sample_counts": false }"#).unwrap();

    let loaded = RenderConfig::load(&path).unwrap();
    assert_eq!(loaded.workers, 2);
    assert!(!loaded.detail_sample_counts);
    assert!(loaded.use_midpoint);
    assert_eq!(loaded.separator_threshold, 15.0);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("render.toml");
    std::fs::write(&path, "queue_capacity = 0\n").unwrap();

    assert!(RenderConfig::load(&path).is_err());
    assert_eq!(RenderConfig::load_or_default(&path), RenderConfig::default());
}

#[test]
fn test_pipeline_from_config() {
    let config = RenderConfig {
        workers: 16,
        use_midpoint: false,
        ..Default::default()
    };
    let vp = ViewportAttributes::from_config(&config, TimeWindow::new(0, 100), 10, 20.0);
    let builder = TraceBuilder::new(3).samples_per_line(10);
    let db = builder.build();

    let outcome = RasterPipeline::from_config(&config, vp)
        .run(
            &db,
            &common::builders::test_classifier,
            |_| tracevis_rs::raster::DetailSink::new(),
            &tracevis_rs::pipeline::NoProgress,
        )
        .unwrap();

    // Never more workers than lines
    assert_eq!(outcome.summary.workers, 3);
    assert_eq!(outcome.summary.lines_published, 3);
    // Scale 20 is above the separator threshold
    assert!(outcome.results.try_iter().all(|r| r.height == 19));
}
