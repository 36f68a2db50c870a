//! Guided calibration session
//!
//! Walks the user through an ordered target sequence, capturing exactly
//! one gaze sample per target on an external trigger. When the last
//! target is captured the mapper is fit from the accumulated samples and
//! the samples are discarded — only the mapping survives the session.

use crate::tracking::mapper::{self, CalibrationSample, FitOutcome, MIN_SAMPLES};

/// Default target sequence: 3x3 grid at {0.1, 0.5, 0.9} viewport
/// fractions (corners, edge midpoints, center), inset so the rendered
/// targets stay fully on-screen. Order is fixed — deterministic runs are
/// easier to debug and predict.
pub const DEFAULT_TARGETS: [(f64, f64); 9] = [
    (0.1, 0.1),
    (0.5, 0.1),
    (0.9, 0.1),
    (0.1, 0.5),
    (0.5, 0.5),
    (0.9, 0.5),
    (0.1, 0.9),
    (0.5, 0.9),
    (0.9, 0.9),
];

/// Session state: idle, or waiting for the sample at target `i`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Idle,
    AwaitingSample(usize),
}

/// What a capture trigger did
#[derive(Clone, Copy, Debug)]
pub enum CaptureOutcome {
    /// No session running; trigger ignored
    Inactive,
    /// Pipeline had no usable point yet; still on the same target
    NoPoint,
    /// Sample stored, moved on to the next target
    Advanced { next_index: usize },
    /// Sequence finished; `fit` is `None` only if fewer than 3 samples
    /// accumulated (impossible with a valid target set, guarded anyway)
    Completed { fit: Option<FitOutcome> },
}

/// Calibration session state machine
///
/// Owns its samples exclusively; they are unreadable outside an active
/// session and consumed exactly once by the completing fit.
pub struct CalibrationSession {
    targets: Vec<(f64, f64)>,
    samples: Vec<CalibrationSample>,
    state: SessionState,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            samples: Vec::new(),
            state: SessionState::Idle,
        }
    }

    /// Begin a session over the given target sequence
    ///
    /// Any previous partial session is discarded. Target sets smaller
    /// than `MIN_SAMPLES` are rejected (the fit would be ill-posed).
    pub fn start(&mut self, targets: Vec<(f64, f64)>) -> bool {
        if targets.len() < MIN_SAMPLES {
            return false;
        }
        self.targets = targets;
        self.samples.clear();
        self.state = SessionState::AwaitingSample(0);
        true
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Target the user should currently be looking at (viewport fractions)
    pub fn current_target(&self) -> Option<(f64, f64)> {
        match self.state {
            SessionState::AwaitingSample(i) => self.targets.get(i).copied(),
            SessionState::Idle => None,
        }
    }

    /// (samples captured, total targets)
    pub fn progress(&self) -> (usize, usize) {
        (self.samples.len(), self.targets.len())
    }

    /// External capture trigger: pair the pipeline's current point with
    /// the current target
    ///
    /// `feature` is the smoothed gaze point normalized against the
    /// current viewport, or `None` when the pipeline has nothing usable
    /// this frame (no point yet, or a degenerate viewport) — in that
    /// case the trigger is dropped and the session stays on the same
    /// target.
    pub fn capture(&mut self, feature: Option<(f64, f64)>) -> CaptureOutcome {
        let index = match self.state {
            SessionState::AwaitingSample(i) => i,
            SessionState::Idle => return CaptureOutcome::Inactive,
        };

        let feature = match feature {
            Some(f) => f,
            None => return CaptureOutcome::NoPoint,
        };

        // One sample per trigger per target, never re-captured once
        // the index advances.
        self.samples.push(CalibrationSample {
            feature,
            target: self.targets[index],
        });

        let next = index + 1;
        if next < self.targets.len() {
            self.state = SessionState::AwaitingSample(next);
            return CaptureOutcome::Advanced { next_index: next };
        }

        // Sequence complete: fit, then drop the samples.
        let fit = mapper::fit(&self.samples);
        self.samples.clear();
        self.state = SessionState::Idle;
        CaptureOutcome::Completed { fit }
    }

    /// Abandon the session, discarding any partial samples
    ///
    /// Never touches the installed mapping — that belongs to the
    /// pipeline.
    pub fn abort(&mut self) {
        self.samples.clear();
        self.state = SessionState::Idle;
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}
