//! Highlight state machine for the simulator's tracked controls.
//!
//! The controller owns every tracked target and enforces the single-active
//! invariant procedurally: activating a target always clears all targets
//! first, so at most one is ever highlighted. Each highlighted target runs
//! a cancellable pulse animation; cancellation restores the exact scale the
//! target had when it was registered, so repeated activate/deactivate
//! cycles never drift.

pub mod pulse;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::intent::TargetId;
use pulse::PulseHandle;

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Three-component scale vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Uniformly scaled copy.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
}

/// A visual element the simulator exposes for highlighting.
///
/// Implementations are thin adapters over whatever actually draws the
/// control (a renderer material, a console line, a test double). The
/// controller and its pulse tasks are the only writers.
pub trait VisualTarget: Send {
    fn set_color(&mut self, color: Color);
    fn scale(&self) -> Vec3;
    fn set_scale(&mut self, scale: Vec3);
}

/// Shared handle to a visual target. The mutex is the write boundary
/// between the controller and a running pulse task.
pub type SharedVisual = Arc<Mutex<dyn VisualTarget>>;

/// Tuning for the highlight look and the pulse animation.
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Peak scale multiplier the pulse ramps up to.
    pub pulse_peak: f32,
    /// Half-cycles per second: a full ramp up (or down) takes
    /// `1.0 / pulse_speed` seconds.
    pub pulse_speed: f32,
    /// Interval between animation steps.
    pub tick_interval: Duration,
    /// Color applied to the active target.
    pub highlight_color: Color,
    /// Color applied to every inactive target.
    pub transparent_color: Color,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            pulse_peak: 2.0,
            pulse_speed: 2.0,
            tick_interval: Duration::from_millis(16),
            highlight_color: Color::rgba(0.0, 1.0, 0.0, 1.0),
            transparent_color: Color::rgba(1.0, 1.0, 1.0, 0.05),
        }
    }
}

struct TrackedTarget {
    visual: SharedVisual,
    /// Captured once at registration; never written afterwards.
    original_scale: Vec3,
    pulse: Option<PulseHandle>,
}

/// Owns the tracked targets and drives highlight transitions.
///
/// States are `AllTransparent` or `Highlighting(target)` for exactly one
/// target; [`HighlightController::activate`] moves between them and
/// [`HighlightController::deactivate_all`] always lands back on
/// `AllTransparent`.
///
/// `activate` spawns the pulse task on the ambient Tokio runtime, so the
/// controller must be used from within one.
pub struct HighlightController {
    config: HighlightConfig,
    targets: HashMap<TargetId, TrackedTarget>,
}

impl HighlightController {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            targets: HashMap::new(),
        }
    }

    /// Registers a target, recording its current scale as the original and
    /// painting it transparent.
    pub fn register(&mut self, id: TargetId, visual: SharedVisual) {
        let original_scale = {
            let mut target = visual.lock().unwrap();
            target.set_color(self.config.transparent_color);
            target.scale()
        };
        let replaced = self.targets.insert(
            id,
            TrackedTarget {
                visual,
                original_scale,
                pulse: None,
            },
        );
        if replaced.is_some() {
            tracing::warn!(target: "highlight", "target {id} registered twice, replacing");
        }
    }

    /// The currently highlighted target, if any.
    pub fn active(&self) -> Option<TargetId> {
        self.targets
            .iter()
            .find(|(_, target)| target.pulse.is_some())
            .map(|(id, _)| *id)
    }

    /// Highlights `id` exclusively: every other target is cleared and reset
    /// before the named one starts pulsing. An unregistered id logs a
    /// warning and leaves the current state untouched.
    pub fn activate(&mut self, id: TargetId) {
        if !self.targets.contains_key(&id) {
            tracing::warn!(target: "highlight", "unknown highlight target: {id}");
            return;
        }

        self.clear_targets();

        if let Some(target) = self.targets.get_mut(&id) {
            target
                .visual
                .lock()
                .unwrap()
                .set_color(self.config.highlight_color);
            target.pulse = Some(pulse::start(
                Arc::clone(&target.visual),
                target.original_scale,
                &self.config,
            ));
            tracing::debug!(target: "highlight", "highlighting {id}");
        }
    }

    /// Clears every target back to transparent at its original scale.
    pub fn deactivate_all(&mut self) {
        self.clear_targets();
    }

    /// The cancellation/reset sweep shared by `activate` and
    /// `deactivate_all`. Scales are only rewritten for targets that had a
    /// running pulse; everything else is already at its original scale.
    fn clear_targets(&mut self) {
        for target in self.targets.values_mut() {
            let pulse = target.pulse.take();
            if let Some(handle) = &pulse {
                handle.cancel();
            }
            // The reset happens under the same lock the pulse task writes
            // through; the task re-checks its token there, so no stale
            // scale write can land after this.
            let mut visual = target.visual.lock().unwrap();
            visual.set_color(self.config.transparent_color);
            if pulse.is_some() {
                visual.set_scale(target.original_scale);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recording double for a renderer-backed control. State lives behind
    /// shared handles so tests can observe it while the controller owns the
    /// `SharedVisual`.
    #[derive(Clone)]
    struct Probe {
        color: Arc<Mutex<Color>>,
        scale: Arc<Mutex<Vec3>>,
    }

    impl Probe {
        fn color(&self) -> Color {
            *self.color.lock().unwrap()
        }

        fn scale(&self) -> Vec3 {
            *self.scale.lock().unwrap()
        }
    }

    struct FakeTarget {
        probe: Probe,
    }

    impl VisualTarget for FakeTarget {
        fn set_color(&mut self, color: Color) {
            *self.probe.color.lock().unwrap() = color;
        }

        fn scale(&self) -> Vec3 {
            *self.probe.scale.lock().unwrap()
        }

        fn set_scale(&mut self, scale: Vec3) {
            *self.probe.scale.lock().unwrap() = scale;
        }
    }

    fn fake_target(scale: Vec3) -> (SharedVisual, Probe) {
        let probe = Probe {
            color: Arc::new(Mutex::new(Color::rgba(1.0, 1.0, 1.0, 1.0))),
            scale: Arc::new(Mutex::new(scale)),
        };
        let visual: SharedVisual = Arc::new(Mutex::new(FakeTarget {
            probe: probe.clone(),
        }));
        (visual, probe)
    }

    fn test_config() -> HighlightConfig {
        HighlightConfig {
            tick_interval: Duration::from_millis(5),
            ..HighlightConfig::default()
        }
    }

    fn controller_with_targets() -> (HighlightController, Probe, Probe) {
        let mut controller = HighlightController::new(test_config());
        let (power, power_probe) = fake_target(Vec3::splat(1.0));
        let (cancel, cancel_probe) = fake_target(Vec3::new(2.0, 2.0, 2.0));
        controller.register(TargetId::PowerButton, power);
        controller.register(TargetId::CancelButton, cancel);
        (controller, power_probe, cancel_probe)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registration_paints_transparent() {
        let (controller, power, cancel) = controller_with_targets();
        let transparent = controller.config.transparent_color;
        assert_eq!(power.color(), transparent);
        assert_eq!(cancel.color(), transparent);
        assert_eq!(controller.active(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_activate_is_mutually_exclusive() {
        let (mut controller, power, cancel) = controller_with_targets();
        let highlight = controller.config.highlight_color;
        let transparent = controller.config.transparent_color;

        controller.activate(TargetId::PowerButton);
        assert_eq!(power.color(), highlight);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_ne!(power.scale(), Vec3::splat(1.0));

        controller.activate(TargetId::CancelButton);
        assert_eq!(controller.active(), Some(TargetId::CancelButton));
        // The displaced target is immediately back at its exact original
        // scale and transparent again.
        assert_eq!(power.scale(), Vec3::splat(1.0));
        assert_eq!(power.color(), transparent);
        assert_eq!(cancel.color(), highlight);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_ne!(cancel.scale(), Vec3::new(2.0, 2.0, 2.0));
        // No stale pulse writes land on the displaced target.
        assert_eq!(power.scale(), Vec3::splat(1.0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_deactivate_all_restores_originals_without_drift() {
        let (mut controller, power, cancel) = controller_with_targets();

        for _ in 0..3 {
            controller.activate(TargetId::PowerButton);
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.activate(TargetId::CancelButton);
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.deactivate_all();
        }

        assert_eq!(controller.active(), None);
        assert_eq!(power.scale(), Vec3::splat(1.0));
        assert_eq!(cancel.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_target_leaves_state_unchanged() {
        let (mut controller, _power, _cancel) = controller_with_targets();
        controller.activate(TargetId::PowerButton);
        // RestartButton was never registered; the active highlight stays.
        controller.activate(TargetId::RestartButton);
        assert_eq!(controller.active(), Some(TargetId::PowerButton));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_deactivate_without_pulse_keeps_scale() {
        let (mut controller, power, _cancel) = controller_with_targets();
        controller.deactivate_all();
        assert_eq!(power.scale(), Vec3::splat(1.0));
    }
}
