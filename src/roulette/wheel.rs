//! Wheel spin state machine.
//!
//! The wheel free-spins at constant angular velocity until the user hits
//! STOP. The winner is chosen at stop time (by the caller, uniformly at
//! random), and the wheel computes a closed-form target rotation that lands
//! the middle of the winner's segment under the top pointer after four extra
//! full turns, easing out over four seconds.

use std::time::{Duration, Instant};

/// Free-spin angular velocity in degrees per second.
pub const FREE_SPIN_DEG_PER_SEC: f64 = 150.0;

/// Duration of the eased deceleration after STOP.
pub const STOP_DURATION: Duration = Duration::from_secs(4);

/// Full turns added on top of the landing distance, so the stop always
/// looks like a real wind-down rather than a snap.
pub const EXTRA_TURNS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Free-spinning, waiting for STOP.
    Spinning,
    /// Decelerating toward a pre-selected winner.
    Stopping,
    /// At rest, winner reported.
    Idle,
}

#[derive(Debug, Clone)]
struct StopPlan {
    start_rotation: f64,
    target_rotation: f64,
    started: Instant,
    winner: usize,
}

#[derive(Debug, Clone)]
pub struct Wheel {
    rotation: f64,
    phase: Phase,
    last_tick: Option<Instant>,
    stop: Option<StopPlan>,
}

impl Wheel {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            phase: Phase::Spinning,
            last_tick: None,
            stop: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current rotation in degrees. Grows without bound while spinning;
    /// display code should fold it modulo 360.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Advance the animation. Returns the winner index exactly once, on the
    /// tick where the deceleration completes.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        match self.phase {
            Phase::Spinning => {
                if let Some(last) = self.last_tick {
                    let dt = now.saturating_duration_since(last).as_secs_f64();
                    self.rotation += FREE_SPIN_DEG_PER_SEC * dt;
                }
                self.last_tick = Some(now);
                None
            }
            Phase::Stopping => {
                let plan = self.stop.as_ref()?;
                let elapsed = now.saturating_duration_since(plan.started);
                let t = (elapsed.as_secs_f64() / STOP_DURATION.as_secs_f64()).min(1.0);
                self.rotation =
                    plan.start_rotation + (plan.target_rotation - plan.start_rotation) * ease_out_cubic(t);

                if t >= 1.0 {
                    // Land exactly on the target so the pointer math is precise
                    self.rotation = plan.target_rotation;
                    let winner = plan.winner;
                    self.phase = Phase::Idle;
                    self.stop = None;
                    self.last_tick = Some(now);
                    return Some(winner);
                }
                self.last_tick = Some(now);
                None
            }
            Phase::Idle => {
                self.last_tick = Some(now);
                None
            }
        }
    }

    /// Begin decelerating toward `winner`. Only valid while free-spinning;
    /// returns false otherwise so a second STOP is ignored.
    pub fn begin_stop(&mut self, winner: usize, segments: usize, now: Instant) -> bool {
        if self.phase != Phase::Spinning || segments < 2 || winner >= segments {
            return false;
        }

        let target = target_rotation(self.rotation, winner, segments);
        self.stop = Some(StopPlan {
            start_rotation: self.rotation,
            target_rotation: target,
            started: now,
            winner,
        });
        self.phase = Phase::Stopping;
        true
    }

    /// Return to free-spinning for another round. The accumulated rotation
    /// is folded back into [0, 360) so it never grows without bound across
    /// spins.
    pub fn reset(&mut self, now: Instant) {
        self.rotation = self.rotation.rem_euclid(360.0);
        self.phase = Phase::Spinning;
        self.stop = None;
        self.last_tick = Some(now);
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

/// Angle covered by one segment, in degrees.
pub fn segment_angle(segments: usize) -> f64 {
    360.0 / segments as f64
}

/// The absolute rotation that parks the middle of `winner`'s segment under
/// the top pointer, reached by always rotating forward: the remaining
/// distance to the target angle (normalized into (0, 360]) plus
/// [`EXTRA_TURNS`] full revolutions.
pub fn target_rotation(rotation: f64, winner: usize, segments: usize) -> f64 {
    let seg = segment_angle(segments);
    let target_angle = 360.0 - (winner as f64 * seg + seg / 2.0);

    let current_base = rotation.rem_euclid(360.0);
    let mut distance = target_angle - current_base;
    if distance <= 0.0 {
        distance += 360.0;
    }

    rotation + distance + EXTRA_TURNS * 360.0
}

/// Which segment sits under the top pointer for a resting rotation.
pub fn index_at_pointer(rotation: f64, segments: usize) -> usize {
    let seg = segment_angle(segments);
    let pointer_angle = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
    ((pointer_angle / seg) as usize) % segments
}

/// Cubic ease-out: fast start, gentle landing. Matches the endpoints of the
/// original stop transition.
pub fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_lands_on_winner() {
        for segments in 2..=9 {
            for winner in 0..segments {
                for start in [0.0, 17.3, 359.9, 720.0, 1441.5] {
                    let target = target_rotation(start, winner, segments);
                    assert_eq!(
                        index_at_pointer(target, segments),
                        winner,
                        "segments={segments} winner={winner} start={start}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_target_always_spins_forward() {
        for start in [0.0, 90.0, 300.0, 1000.0] {
            let target = target_rotation(start, 1, 4);
            let travel = target - start;
            assert!(travel > EXTRA_TURNS * 360.0);
            assert!(travel <= (EXTRA_TURNS + 1.0) * 360.0);
        }
    }

    #[test]
    fn test_easing_endpoints_and_monotonic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_cubic(i as f64 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_stop_completes_with_winner() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        wheel.tick(t0);
        wheel.tick(t0 + Duration::from_millis(500));
        assert!(wheel.rotation() > 0.0);

        assert!(wheel.begin_stop(2, 5, t0 + Duration::from_millis(500)));
        assert_eq!(wheel.phase(), Phase::Stopping);

        // Mid-stop: still animating, no winner yet
        assert_eq!(wheel.tick(t0 + Duration::from_millis(2500)), None);

        let winner = wheel.tick(t0 + Duration::from_millis(500) + STOP_DURATION);
        assert_eq!(winner, Some(2));
        assert_eq!(wheel.phase(), Phase::Idle);
        assert_eq!(index_at_pointer(wheel.rotation(), 5), 2);
    }

    #[test]
    fn test_winner_reported_exactly_once() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        wheel.begin_stop(0, 2, t0);
        assert_eq!(wheel.tick(t0 + STOP_DURATION), Some(0));
        assert_eq!(wheel.tick(t0 + STOP_DURATION + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_stop_refused_unless_spinning() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        assert!(wheel.begin_stop(0, 3, t0));
        // Already stopping
        assert!(!wheel.begin_stop(1, 3, t0));

        wheel.tick(t0 + STOP_DURATION);
        assert_eq!(wheel.phase(), Phase::Idle);
        // Idle: must reset first
        assert!(!wheel.begin_stop(1, 3, t0 + STOP_DURATION));
    }

    #[test]
    fn test_stop_refused_for_bad_input() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        assert!(!wheel.begin_stop(0, 1, t0));
        assert!(!wheel.begin_stop(3, 3, t0));
        assert_eq!(wheel.phase(), Phase::Spinning);
    }

    #[test]
    fn test_reset_folds_rotation_and_respins() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        wheel.begin_stop(1, 4, t0);
        wheel.tick(t0 + STOP_DURATION);
        assert_eq!(wheel.phase(), Phase::Idle);

        let resting = wheel.rotation().rem_euclid(360.0);
        wheel.reset(t0 + STOP_DURATION);
        assert_eq!(wheel.phase(), Phase::Spinning);
        assert!((wheel.rotation() - resting).abs() < 1e-9);
        assert!(wheel.rotation() >= 0.0 && wheel.rotation() < 360.0);
    }

    #[test]
    fn test_free_spin_velocity() {
        let t0 = Instant::now();
        let mut wheel = Wheel::new();
        wheel.tick(t0);
        wheel.tick(t0 + Duration::from_secs(2));
        let expected = FREE_SPIN_DEG_PER_SEC * 2.0;
        assert!((wheel.rotation() - expected).abs() < 1e-6);
    }
}
