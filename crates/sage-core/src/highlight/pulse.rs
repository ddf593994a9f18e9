//! Cancellable pulse animation.
//!
//! A pulse ramps a target's scale from its original up to a configured peak
//! and back, linearly, forever, one write per tick. The waveform is a pure
//! function of accumulated phase so it can be tested without a runtime.

use tokio_util::sync::CancellationToken;

use super::{HighlightConfig, SharedVisual, Vec3};

/// Handle to a running pulse task.
///
/// Cancellation is synchronous from the controller's perspective: the task
/// re-checks the token under the target lock before every write, and the
/// controller performs its reset under that same lock after cancelling, so
/// the next read of the target's scale observes the original value.
#[derive(Debug)]
pub struct PulseHandle {
    token: CancellationToken,
}

impl PulseHandle {
    /// Stops the pulse. The task exits at its next tick without writing.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PulseHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns the pulse task for one target. Must be called within a Tokio
/// runtime.
pub(super) fn start(
    visual: SharedVisual,
    original_scale: Vec3,
    config: &HighlightConfig,
) -> PulseHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();
    let tick_interval = config.tick_interval;
    let pulse_speed = config.pulse_speed;
    let pulse_peak = config.pulse_peak;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick_interval);
        let dt = tick_interval.as_secs_f32();
        let mut phase = 0.0_f32;

        loop {
            ticker.tick().await;
            if task_token.is_cancelled() {
                break;
            }
            phase += dt * pulse_speed;
            let scale = original_scale.scaled(multiplier_at(phase, pulse_peak));

            let mut target = visual.lock().unwrap();
            // Re-check under the lock: the controller resets the scale
            // while holding it, after cancelling the token.
            if task_token.is_cancelled() {
                break;
            }
            target.set_scale(scale);
        }
    });

    PulseHandle { token }
}

/// Triangular waveform between `1.0` and `peak`.
///
/// `phase` counts half-cycles: `0.0..1.0` ramps up, `1.0..2.0` ramps back
/// down, then the pattern repeats.
fn multiplier_at(phase: f32, peak: f32) -> f32 {
    let cycle = phase.rem_euclid(2.0);
    if cycle < 1.0 {
        lerp(1.0, peak, cycle)
    } else {
        lerp(peak, 1.0, cycle - 1.0)
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_endpoints() {
        assert_eq!(multiplier_at(0.0, 2.0), 1.0);
        assert_eq!(multiplier_at(1.0, 2.0), 2.0);
        assert!((multiplier_at(2.0, 2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_waveform_ramps_linearly() {
        assert!((multiplier_at(0.5, 2.0) - 1.5).abs() < 1e-6);
        assert!((multiplier_at(1.5, 2.0) - 1.5).abs() < 1e-6);
        assert!((multiplier_at(0.25, 3.0) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_waveform_repeats() {
        for phase in [0.3_f32, 0.9, 1.4] {
            let a = multiplier_at(phase, 2.0);
            let b = multiplier_at(phase + 2.0, 2.0);
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_waveform_stays_in_band() {
        let mut phase = 0.0_f32;
        while phase < 6.0 {
            let m = multiplier_at(phase, 2.0);
            assert!((1.0..=2.0).contains(&m), "multiplier {m} out of band");
            phase += 0.01;
        }
    }
}
