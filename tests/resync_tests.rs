//! The debounced geometry resync pass, end to end over mock surfaces.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{TestRig, RIG_COLUMN_HEADER_HEIGHT, RIG_ROW_HEADER_WIDTH, RIG_SCROLLBAR};
use quadview::{GridConfig, GridLayout, QuadrantSync, ResyncReport, SettleOutcome};

fn frozen_config() -> GridConfig {
    GridConfig {
        frozen_rows: 3,
        frozen_columns: 2,
        ..GridConfig::default()
    }
}

#[test]
fn test_mount_resync_establishes_quadrant_geometry() {
    let mut rig = TestRig::new(frozen_config());
    rig.engine.did_mount();

    // Row headers pinned to MAIN's natural width, in every quadrant.
    assert_eq!(rig.main.row_header.css_width(), Some(RIG_ROW_HEADER_WIDTH));
    assert_eq!(rig.left.row_header.css_width(), Some(RIG_ROW_HEADER_WIDTH));

    // Menu corner flush with both headers.
    assert_eq!(rig.top_left.menu.css_width(), Some(RIG_ROW_HEADER_WIDTH));
    assert_eq!(rig.top_left.menu.css_height(), Some(RIG_COLUMN_HEADER_HEIGHT));

    // 2 frozen 50px columns + 80px row header; 3 frozen 20px rows + 30px
    // column header.
    assert_eq!(rig.left.container.css_width(), Some(180.0));
    assert_eq!(rig.top_left.container.css_width(), Some(180.0));
    assert_eq!(rig.top.container.css_height(), Some(90.0));
    assert_eq!(rig.top_left.container.css_height(), Some(90.0));

    // Frozen strips pull back to reveal MAIN's scrollbars.
    assert_eq!(rig.top.container.right_inset(), RIG_SCROLLBAR);
    assert_eq!(rig.left.container.bottom_inset(), RIG_SCROLLBAR);

    let report = rig.engine.last_report();
    assert_eq!(report.measurements.frozen_columns_width, 100.0);
    assert_eq!(report.measurements.frozen_rows_height, 60.0);
    assert_eq!(report.geometry.left_quadrant_width, 180.0);
    assert_eq!(report.geometry.top_quadrant_height, 90.0);
}

#[test]
fn test_hidden_row_header_measures_zero() {
    let config = GridConfig {
        show_row_header: false,
        frozen_columns: 2,
        ..GridConfig::default()
    };
    let mut rig = TestRig::new(config);
    rig.engine.did_mount();

    let report = rig.engine.last_report();
    assert_eq!(report.measurements.row_header_width, 0.0);
    // Frozen columns alone size the left strip.
    assert_eq!(rig.left.container.css_width(), Some(100.0));
}

#[test]
fn test_zero_frozen_keeps_boundary_border_visible() {
    let mut rig = TestRig::new(GridConfig::default());
    rig.engine.did_mount();

    let report = rig.engine.last_report();
    assert_eq!(report.measurements.frozen_columns_width, 1.0);
    assert_eq!(report.measurements.frozen_rows_height, 1.0);
    assert_eq!(rig.left.container.css_width(), Some(RIG_ROW_HEADER_WIDTH + 1.0));
    assert_eq!(
        rig.top.container.css_height(),
        Some(RIG_COLUMN_HEADER_HEIGHT + 1.0)
    );
}

#[test]
fn test_resync_is_idempotent() {
    let mut rig = TestRig::new(frozen_config());
    rig.engine.resync();
    let first = *rig.engine.last_report();

    rig.engine.resync();
    assert_eq!(*rig.engine.last_report(), first);
    assert_eq!(rig.left.container.css_width(), Some(180.0));
}

#[test]
fn test_resync_before_mount_is_a_noop() {
    let mut engine =
        QuadrantSync::new(GridLayout::uniform(10, 10, 20.0, 50.0), GridConfig::default()).unwrap();
    engine.resync();
    assert_eq!(*engine.last_report(), ResyncReport::default());
}

#[test]
fn test_scroll_burst_coalesces_to_one_resync() {
    let mut rig = TestRig::new(frozen_config());

    // Ten scroll events 30ms apart: every one admitted, none settle.
    for i in 0..10u32 {
        let now = f64::from(i) * 30.0;
        rig.main.scroll.force_scroll(now, now);
        rig.engine.handle_main_scroll(now);
    }
    assert_eq!(rig.main.row_header.width_writes(), 0);
    assert_eq!(rig.engine.resync_deadline(), Some(520.0));

    // A timer armed by an early event fires before quiescence: re-arm.
    assert_eq!(
        rig.engine.handle_settle_timer(300.0),
        SettleOutcome::Reschedule(220.0)
    );
    assert_eq!(rig.main.row_header.width_writes(), 0);

    // The trailing deadline runs exactly one pass.
    assert_eq!(rig.engine.handle_settle_timer(520.0), SettleOutcome::Run);
    assert_eq!(rig.main.row_header.width_writes(), 1);
    assert_eq!(rig.engine.handle_settle_timer(520.0), SettleOutcome::Idle);
    assert_eq!(rig.main.row_header.width_writes(), 1);
}

#[test]
fn test_gated_scroll_still_times_the_debounce() {
    let mut rig = TestRig::new(frozen_config());

    rig.main.scroll.force_scroll(10.0, 10.0);
    rig.engine.handle_main_scroll(0.0);
    assert_eq!(rig.engine.resync_deadline(), Some(250.0));

    // A frame-gated event is still scroll activity: the quiescence window
    // restarts from it, not from the last admitted event.
    rig.main.scroll.force_scroll(20.0, 20.0);
    rig.engine.handle_main_scroll(5.0);
    assert_eq!(rig.engine.resync_deadline(), Some(255.0));
}

#[test]
fn test_cancel_disarms_the_pending_resync() {
    let mut rig = TestRig::new(frozen_config());

    rig.main.scroll.force_scroll(10.0, 10.0);
    rig.engine.handle_main_scroll(0.0);
    assert!(rig.engine.resync_deadline().is_some());

    rig.engine.cancel_pending_resync();
    assert_eq!(rig.engine.resync_deadline(), None);
    assert_eq!(rig.engine.handle_settle_timer(1000.0), SettleOutcome::Idle);
    assert_eq!(rig.main.row_header.width_writes(), 0);
}

#[test]
fn test_report_serializes_for_host_debugging() {
    let mut rig = TestRig::new(frozen_config());
    rig.engine.did_mount();

    let json = rig.engine.report_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["measurements"]["row_header_width"], 80.0);
    assert_eq!(value["geometry"]["left_quadrant_width"], 180.0);
}
