//! The quadrant synchronization engine.
//!
//! [`QuadrantSync`] owns everything with cross-quadrant ordering hazards:
//! mirroring MAIN's scroll offsets into the frozen quadrants, routing wheel
//! gestures so all four regions move within the same frame, translating
//! resize/reorder guide coordinates, and scheduling the debounced geometry
//! resync. The engine is headless and clock-driven; the host feeds it
//! events plus timestamps and owns the actual timers (see `dom` for the
//! browser host).
//!
//! All state lives in explicit fields of this struct; there are no
//! process-wide globals. Everything runs on one thread, so correctness
//! rests on the read-before-write discipline of the resync pass and the
//! one-shot wheel guard, not on locking.

mod guides;
mod resync;
mod schedule;

pub use guides::reorder_boundary_index;
pub use resync::{
    apply as resync_apply, compute as resync_compute, measure as resync_measure,
    ResyncGeometry, ResyncMeasurements, ResyncReport, MIN_FROZEN_SIZE,
};
pub use schedule::{FrameGate, SettleDebounce, SettleOutcome, FRAME_INTERVAL_MS};

use crate::config::GridConfig;
use crate::error::{QuadViewError, Result};
use crate::layout::GridGeometry;
use crate::quadrant::Quadrant;
use crate::surface::{SurfaceRef, SurfaceRegistry, SurfaceRole, SurfaceSet};

/// Callback receiving an adjusted guide list (`None` passes through when the
/// gesture produced no guides).
pub type GuideCallback = Box<dyn FnMut(Option<&[f64]>)>;

/// Host-facing callbacks. Absent callbacks are simply not invoked.
#[derive(Default)]
pub(crate) struct SyncCallbacks {
    pub(crate) on_scroll: Option<Box<dyn FnMut()>>,
    pub(crate) on_column_resize_guide: Option<GuideCallback>,
    pub(crate) on_row_resize_guide: Option<GuideCallback>,
    pub(crate) on_columns_reordering: Option<GuideCallback>,
    pub(crate) on_rows_reordering: Option<GuideCallback>,
}

/// Synchronization engine over the four grid quadrants.
pub struct QuadrantSync<G: GridGeometry> {
    pub(crate) geometry: G,
    pub(crate) config: GridConfig,
    pub(crate) registry: SurfaceRegistry,
    pub(crate) callbacks: SyncCallbacks,

    /// One-shot guard: the next native scroll event on MAIN is a re-fire of
    /// a wheel-driven offset write and must not be processed again.
    wheel_guard: bool,
    scroll_gate: FrameGate,
    wheel_gate: FrameGate,
    /// A scroll event arrived while the frame gate was closed; replayed by
    /// [`flush_scroll`](Self::flush_scroll) with fresh offsets.
    pending_scroll: bool,
    /// Wheel deltas coalesced while the frame gate is closed.
    pending_wheel: (f64, f64),
    settle: SettleDebounce,
    last_report: ResyncReport,
}

impl<G: GridGeometry> QuadrantSync<G> {
    /// Create an engine over the given geometry service and configuration.
    ///
    /// # Errors
    /// Returns `QuadViewError::Config` for invalid configuration values.
    pub fn new(geometry: G, config: GridConfig) -> Result<Self> {
        config.validate()?;
        let settle = SettleDebounce::new(config.resync_delay_ms);
        Ok(Self {
            geometry,
            config,
            registry: SurfaceRegistry::new(),
            callbacks: SyncCallbacks::default(),
            wheel_guard: false,
            scroll_gate: FrameGate::new(),
            wheel_gate: FrameGate::new(),
            pending_scroll: false,
            pending_wheel: (0.0, 0.0),
            settle,
            last_report: ResyncReport::default(),
        })
    }

    /// The geometry service in use.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Replace the geometry service (content sizes changed). The caller is
    /// expected to follow up with a resync.
    pub fn set_geometry(&mut self, geometry: G) {
        self.geometry = geometry;
    }

    /// Current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// # Errors
    /// Returns `QuadViewError::Config` for invalid values; the previous
    /// configuration stays in effect.
    pub fn set_config(&mut self, config: GridConfig) -> Result<()> {
        config.validate()?;
        self.settle.set_delay(config.resync_delay_ms);
        self.config = config;
        Ok(())
    }

    /// Register (or replace) a surface. The Rust rendition of the original
    /// mount-time ref callbacks: hosts call this as each region mounts.
    pub fn set_surface(&mut self, quadrant: Quadrant, role: SurfaceRole, surface: SurfaceRef) {
        self.registry.set(quadrant, role, surface);
    }

    /// The registered surfaces for a quadrant.
    pub fn surfaces(&self, quadrant: Quadrant) -> &SurfaceSet {
        self.registry.quadrant(quadrant)
    }

    /// Install the scroll observer, invoked before any offset propagation.
    pub fn set_on_scroll(&mut self, callback: impl FnMut() + 'static) {
        self.callbacks.on_scroll = Some(Box::new(callback));
    }

    /// Install the adjusted column-resize-guide consumer.
    pub fn set_on_column_resize_guide(&mut self, callback: impl FnMut(Option<&[f64]>) + 'static) {
        self.callbacks.on_column_resize_guide = Some(Box::new(callback));
    }

    /// Install the adjusted row-resize-guide consumer.
    pub fn set_on_row_resize_guide(&mut self, callback: impl FnMut(Option<&[f64]>) + 'static) {
        self.callbacks.on_row_resize_guide = Some(Box::new(callback));
    }

    /// Install the column-reordering guide consumer.
    pub fn set_on_columns_reordering(&mut self, callback: impl FnMut(Option<&[f64]>) + 'static) {
        self.callbacks.on_columns_reordering = Some(Box::new(callback));
    }

    /// Install the row-reordering guide consumer.
    pub fn set_on_rows_reordering(&mut self, callback: impl FnMut(Option<&[f64]>) + 'static) {
        self.callbacks.on_rows_reordering = Some(Box::new(callback));
    }

    /// Run once after the surface registry is populated: the mount-time
    /// resync that establishes consistent geometry before first paint.
    pub fn did_mount(&mut self) {
        self.resync();
    }

    /// Native scroll event fired by MAIN's scroll surface.
    ///
    /// Only MAIN is wired to this handler; the frozen quadrants are driven,
    /// never listened to. Gated invocations are deferred, never dropped: a
    /// trailing event within the frame window marks pending work that
    /// [`flush_scroll`](Self::flush_scroll) replays, so the last event of a
    /// gesture always reaches the frozen quadrants.
    pub fn handle_main_scroll(&mut self, now_ms: f64) {
        if self.wheel_guard {
            // Wheel routing already moved every quadrant for this event.
            self.wheel_guard = false;
            return;
        }
        if !self.scroll_gate.admit(now_ms) {
            self.pending_scroll = true;
            self.settle.touch(now_ms);
            return;
        }
        self.pending_scroll = false;

        self.notify_scroll();
        self.mirror_main_offsets();
        self.settle.touch(now_ms);
    }

    /// Replay a gate-deferred scroll event, if any. Hosts call this from
    /// the same frame callback that flushes wheel deltas; MAIN's offsets
    /// are re-read fresh, so coalescing loses no motion.
    pub fn flush_scroll(&mut self, now_ms: f64) {
        if !self.pending_scroll {
            return;
        }
        self.pending_scroll = false;

        self.notify_scroll();
        self.mirror_main_offsets();
        self.settle.touch(now_ms);
    }

    fn mirror_main_offsets(&self) {
        let (scroll_left, scroll_top) = self.registry.scroll_offset(Quadrant::Main);
        if !self.config.vertical_scroll_disabled {
            if let Some(left) = self.registry.scroll_surface(Quadrant::Left) {
                left.set_scroll_top(scroll_top);
            }
        }
        if !self.config.horizontal_scroll_disabled {
            if let Some(top) = self.registry.scroll_surface(Quadrant::Top) {
                top.set_scroll_left(scroll_left);
            }
        }
    }

    /// Wheel gesture on any quadrant.
    ///
    /// The host must have suppressed the event's native default action
    /// synchronously before calling; suppression cannot wait for the
    /// throttled path. Deltas arriving while the frame gate is closed
    /// accumulate and are applied by [`flush_wheel`](Self::flush_wheel) on
    /// the next frame.
    pub fn handle_wheel(&mut self, delta_x: f64, delta_y: f64, now_ms: f64) {
        self.pending_wheel.0 += delta_x;
        self.pending_wheel.1 += delta_y;
        if self.wheel_gate.admit(now_ms) {
            self.apply_pending_wheel(now_ms);
        }
    }

    /// Apply wheel deltas coalesced by the frame gate, if any. Hosts call
    /// this from their frame callback.
    pub fn flush_wheel(&mut self, now_ms: f64) {
        let (dx, dy) = self.pending_wheel;
        if dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON {
            self.apply_pending_wheel(now_ms);
        }
    }

    fn apply_pending_wheel(&mut self, now_ms: f64) {
        let (delta_x, delta_y) = self.pending_wheel;
        self.pending_wheel = (0.0, 0.0);

        // Observers see the pre-gesture offsets.
        self.notify_scroll();

        if !self.config.horizontal_scroll_disabled {
            self.wheel_guard = true;
            if let Some(main) = self.registry.scroll_surface(Quadrant::Main) {
                let next = main.scroll_left() + delta_x;
                main.set_scroll_left(next);
                if let Some(top) = self.registry.scroll_surface(Quadrant::Top) {
                    top.set_scroll_left(next);
                }
            }
        }
        if !self.config.vertical_scroll_disabled {
            self.wheel_guard = true;
            if let Some(main) = self.registry.scroll_surface(Quadrant::Main) {
                let next = main.scroll_top() + delta_y;
                main.set_scroll_top(next);
                if let Some(left) = self.registry.scroll_surface(Quadrant::Left) {
                    left.set_scroll_top(next);
                }
            }
        }

        self.settle.touch(now_ms);
    }

    /// Programmatic scroll.
    ///
    /// Clears the wheel guard first so the resulting native scroll event is
    /// processed (not swallowed), writes MAIN's offsets, then runs an
    /// immediate resync so geometry is consistent when this returns.
    ///
    /// # Errors
    /// Returns `QuadViewError::NotMounted` if MAIN's scroll surface is not
    /// registered; calling before mount is a construction-order fault.
    pub fn scroll_to_position(&mut self, scroll_left: f64, scroll_top: f64) -> Result<()> {
        self.wheel_guard = false;
        let main = self
            .registry
            .scroll_surface(Quadrant::Main)
            .cloned()
            .ok_or(QuadViewError::NotMounted {
                quadrant: Quadrant::Main,
                role: SurfaceRole::ScrollSurface,
            })?;
        main.set_scroll_left(scroll_left);
        main.set_scroll_top(scroll_top);
        self.resync();
        Ok(())
    }

    /// Run the measure/compute/apply geometry pass now.
    ///
    /// A no-op until MAIN's scroll surface is registered, so a settle timer
    /// firing around mount or teardown never faults.
    pub fn resync(&mut self) {
        if self.registry.scroll_surface(Quadrant::Main).is_none() {
            return;
        }
        let measurements = resync::measure(&self.registry, &self.geometry, &self.config);
        let geometry = resync::compute(&measurements);
        resync::apply(&self.registry, &geometry);
        self.last_report = ResyncReport {
            measurements,
            geometry,
        };
    }

    /// Deadline of the pending debounced resync, if armed. Hosts arm their
    /// timer from this.
    pub fn resync_deadline(&self) -> Option<f64> {
        self.settle.deadline()
    }

    /// Settle timer fired: either run the debounced resync, or report the
    /// remaining delay for the host to re-arm (activity continued after the
    /// timer was set).
    pub fn handle_settle_timer(&mut self, now_ms: f64) -> SettleOutcome {
        let outcome = self.settle.fire(now_ms);
        if matches!(outcome, SettleOutcome::Run) {
            self.resync();
        }
        outcome
    }

    /// Disarm the pending resync. Hosts call this on teardown, alongside
    /// cancelling their own timer, so no resync runs after the owner is
    /// gone.
    pub fn cancel_pending_resync(&mut self) {
        self.settle.cancel();
    }

    /// Snapshot of the last resync pass.
    pub fn last_report(&self) -> &ResyncReport {
        &self.last_report
    }

    /// The last resync pass as JSON, for host-side debugging.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn report_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.last_report)?)
    }

    fn notify_scroll(&mut self) {
        if let Some(on_scroll) = self.callbacks.on_scroll.as_mut() {
            on_scroll();
        }
    }
}

impl<G: GridGeometry> Drop for QuadrantSync<G> {
    fn drop(&mut self) {
        self.settle.cancel();
    }
}
