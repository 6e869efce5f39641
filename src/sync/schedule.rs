//! Scheduling glue: per-frame throttling and scroll-settle debouncing.
//!
//! Both primitives are clock-driven rather than timer-owning: callers pass
//! the current timestamp in and own the actual timer (a browser timeout on
//! wasm, explicit calls in tests). This keeps the engine headless and makes
//! burst behavior deterministic under test.

/// Nominal rendering frame interval (ms).
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Admits at most one execution per frame interval.
///
/// The first call always admits. Rejected work is deferred by the caller
/// (a pending-scroll flag, accumulated wheel deltas) and replayed from
/// its frame callback.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameGate {
    /// Gate with the nominal frame interval.
    pub fn new() -> Self {
        Self::with_interval(FRAME_INTERVAL_MS)
    }

    /// Gate with a custom interval.
    pub fn with_interval(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// True if an execution is allowed at `now_ms`; records the admission.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Forget the last admission so the next call admits unconditionally.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

/// What the settle timer should do when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleOutcome {
    /// No activity is pending; nothing to do.
    Idle,
    /// Activity happened within the quiescence window; re-arm for the
    /// given remaining delay.
    Reschedule(f64),
    /// The grid has been quiet for the full delay; run the resync now.
    Run,
}

/// Trailing-edge debounce for the post-scroll resync.
///
/// Each [`touch`](Self::touch) replaces any pending deadline, so a burst of
/// scroll events produces exactly one run, timed from the last event. A
/// timer that fires early (activity continued after it was armed) is told
/// to re-arm rather than run.
#[derive(Debug, Clone)]
pub struct SettleDebounce {
    delay_ms: f64,
    last_activity_ms: f64,
    deadline_ms: Option<f64>,
}

impl SettleDebounce {
    /// Debounce with the given quiescence delay.
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            last_activity_ms: 0.0,
            deadline_ms: None,
        }
    }

    /// Record scroll activity at `now_ms` and (re-)arm the deadline.
    pub fn touch(&mut self, now_ms: f64) {
        self.last_activity_ms = now_ms;
        self.deadline_ms = Some(now_ms + self.delay_ms);
    }

    /// The pending deadline, if armed.
    pub fn deadline(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Decide what a timer firing at `now_ms` should do.
    pub fn fire(&mut self, now_ms: f64) -> SettleOutcome {
        if self.deadline_ms.is_none() {
            return SettleOutcome::Idle;
        }
        let elapsed = now_ms - self.last_activity_ms;
        if elapsed < self.delay_ms {
            // Still scrolling; the caller re-arms its timer.
            return SettleOutcome::Reschedule(self.delay_ms - elapsed);
        }
        self.deadline_ms = None;
        SettleOutcome::Run
    }

    /// Disarm any pending deadline (teardown obligation).
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// Replace the quiescence delay; takes effect on the next touch.
    pub fn set_delay(&mut self, delay_ms: f64) {
        self.delay_ms = delay_ms;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_first_call_admits() {
        let mut gate = FrameGate::with_interval(16.0);
        assert!(gate.admit(0.0));
        assert!(!gate.admit(5.0));
        assert!(!gate.admit(15.9));
        assert!(gate.admit(16.0));
    }

    #[test]
    fn test_gate_reset() {
        let mut gate = FrameGate::with_interval(16.0);
        assert!(gate.admit(0.0));
        gate.reset();
        assert!(gate.admit(1.0));
    }

    #[test]
    fn test_debounce_idle_without_activity() {
        let mut settle = SettleDebounce::new(250.0);
        assert_eq!(settle.fire(1000.0), SettleOutcome::Idle);
    }

    #[test]
    fn test_debounce_burst_coalesces_to_trailing_edge() {
        let mut settle = SettleDebounce::new(250.0);
        for i in 0..10 {
            settle.touch(i as f64 * 10.0); // last touch at t=90
        }
        assert_eq!(settle.deadline(), Some(340.0));

        // A timer armed by the first touch fires early and must re-arm.
        assert_eq!(settle.fire(250.0), SettleOutcome::Reschedule(90.0));

        // At the trailing deadline it runs and disarms.
        assert_eq!(settle.fire(340.0), SettleOutcome::Run);
        assert_eq!(settle.fire(340.0), SettleOutcome::Idle);
    }

    #[test]
    fn test_debounce_cancel() {
        let mut settle = SettleDebounce::new(250.0);
        settle.touch(0.0);
        settle.cancel();
        assert_eq!(settle.fire(500.0), SettleOutcome::Idle);
    }
}
