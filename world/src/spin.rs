//! Rotational state machine driving the wheel.

use std::time::Duration;

use lucky_wheel_core::{
    normalize_angle, pointer_fraction, ItemId, SpinError, SpinPhase, SpinSnapshot,
    DAMPING_PER_SECOND, DECELERATION_DURATION, INITIAL_ANGULAR_VELOCITY,
};

use crate::items::WeightedItemSet;

/// Transition performed by a single [`SpinEngine::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinTick {
    /// The wheel is idle, nothing was updated.
    Idle,
    /// The wheel rotated without changing phase.
    Rotated,
    /// The first tick of a deceleration latched its start time.
    DecelerationLatched,
    /// The deceleration ran its full duration and the wheel came to rest.
    Settled,
}

#[derive(Clone, Copy, Debug, Default)]
struct SpinState {
    phase: SpinPhase,
    angle: f64,
    angular_velocity: f64,
    deceleration_started_at: Option<Duration>,
    last_tick: Option<Duration>,
}

/// Owns the wheel's angle, velocity and phase and advances them over time.
///
/// The engine never owns the items; callers lend the [`WeightedItemSet`] to
/// each operation that needs it, so item edits are visible on the next call.
#[derive(Clone, Debug, Default)]
pub struct SpinEngine {
    state: SpinState,
    winner: Option<ItemId>,
}

impl SpinEngine {
    /// Creates an idle engine with the wheel at angle zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a spin at the initial angular velocity.
    pub fn start_spin(&mut self, items: &WeightedItemSet) -> Result<(), SpinError> {
        if self.state.phase != SpinPhase::Idle {
            return Err(SpinError::AlreadySpinning);
        }
        if items.is_empty() {
            return Err(SpinError::NoItems);
        }

        self.state.phase = SpinPhase::Spinning;
        self.state.angular_velocity = INITIAL_ANGULAR_VELOCITY;
        self.state.deceleration_started_at = None;
        // A new spin measures time from its own first tick.
        self.state.last_tick = None;
        Ok(())
    }

    /// Switches a spinning wheel into deceleration.
    ///
    /// Returns `Ok(false)` when the wheel was already decelerating.
    pub fn request_stop(&mut self) -> Result<bool, SpinError> {
        match self.state.phase {
            SpinPhase::Idle => Err(SpinError::NotSpinning),
            SpinPhase::Decelerating => Ok(false),
            SpinPhase::Spinning => {
                self.state.phase = SpinPhase::Decelerating;
                self.state.deceleration_started_at = None;
                Ok(true)
            }
        }
    }

    /// Advances the rotation to `now` and re-resolves the winner.
    ///
    /// `last_tick` carries across the spin-to-deceleration boundary, so the
    /// first decelerating tick integrates the time since the last spinning
    /// tick. Timestamps earlier than the previous tick count as zero elapsed.
    pub fn advance(&mut self, now: Duration, items: &WeightedItemSet) -> SpinTick {
        if self.state.phase == SpinPhase::Idle {
            return SpinTick::Idle;
        }

        let dt_ms = self
            .state
            .last_tick
            .map_or(0.0, |last| millis(now.saturating_sub(last)));

        let mut tick = SpinTick::Rotated;
        match self.state.phase {
            SpinPhase::Idle => {}
            SpinPhase::Spinning => {
                self.state.angle += self.state.angular_velocity * dt_ms;
            }
            SpinPhase::Decelerating => {
                let started_at = match self.state.deceleration_started_at {
                    Some(started_at) => started_at,
                    None => {
                        tick = SpinTick::DecelerationLatched;
                        self.state.deceleration_started_at = Some(now);
                        now
                    }
                };
                let elapsed = now.saturating_sub(started_at);
                self.state.angular_velocity = decelerated_velocity(elapsed);
                self.state.angle += self.state.angular_velocity * dt_ms;

                if elapsed >= DECELERATION_DURATION {
                    self.state.phase = SpinPhase::Idle;
                    self.state.angular_velocity = 0.0;
                    self.state.deceleration_started_at = None;
                    tick = SpinTick::Settled;
                }
            }
        }

        self.state.angle = normalize_angle(self.state.angle);
        self.state.last_tick = Some(now);
        let _ = self.refresh_winner(items);
        tick
    }

    /// Re-resolves the item under the pointer for the current angle.
    pub fn refresh_winner(&mut self, items: &WeightedItemSet) -> Option<ItemId> {
        self.winner = items
            .resolve(pointer_fraction(self.state.angle))
            .ok()
            .map(|item| item.id());
        self.winner
    }

    /// Item under the pointer after the last resolution.
    #[must_use]
    pub const fn current_winner(&self) -> Option<ItemId> {
        self.winner
    }

    /// Wheel angle in radians within `[0, 2π)`.
    #[must_use]
    pub const fn current_angle(&self) -> f64 {
        self.state.angle
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SpinPhase {
        self.state.phase
    }

    /// Current angular velocity in radians per millisecond.
    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.state.angular_velocity
    }

    /// Immutable copy of the rotational state.
    #[must_use]
    pub const fn snapshot(&self) -> SpinSnapshot {
        SpinSnapshot {
            phase: self.state.phase,
            angle: self.state.angle,
            angular_velocity: self.state.angular_velocity,
            deceleration_started_at: self.state.deceleration_started_at,
            last_tick: self.state.last_tick,
        }
    }
}

/// Angular velocity after `elapsed` time of deceleration.
#[must_use]
pub fn decelerated_velocity(elapsed: Duration) -> f64 {
    INITIAL_ANGULAR_VELOCITY * (-DAMPING_PER_SECOND * elapsed.as_secs_f64()).exp()
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
