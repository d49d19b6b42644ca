//! Cooldown-gated abilities, the slow-motion toggle, and the possession link.
//!
//! Every timed ability follows the same two-state machine:
//!
//! ```text
//! Ready ──activate──▶ CoolingDown ──timer expiry──▶ Ready
//! ```
//!
//! Activation during `CoolingDown` is a no-op.  The countdown itself lives in
//! the owner's [`AbilityTimers`]; [`Cooldown::on_timer`] is called by the
//! owner's timer system when a token expires.

use crate::effects::SoundCue;
use crate::scheduler::{AbilityTimers, TimerToken};
use bevy::prelude::*;

// ── Cooldown ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityState {
    #[default]
    Ready,
    CoolingDown,
}

/// Ready flag paired with a countdown armed on activation.
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    pub token: TimerToken,
    /// Seconds between activation and the ability becoming ready again.
    pub duration: f32,
    pub state: AbilityState,
}

impl Cooldown {
    pub fn new(token: TimerToken, duration: f32) -> Self {
        Self {
            token,
            duration,
            state: AbilityState::Ready,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == AbilityState::Ready
    }

    /// Enter `CoolingDown` and arm the countdown.  Returns `false` (and
    /// changes nothing) when already cooling down.
    pub fn try_activate(&mut self, timers: &mut AbilityTimers) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.state = AbilityState::CoolingDown;
        timers.schedule(self.token, self.duration);
        true
    }

    /// Handle an expired timer.  Returns `true` if `token` belonged to this
    /// cooldown.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if token != self.token {
            return false;
        }
        self.state = AbilityState::Ready;
        true
    }
}

// ── Time dilation ─────────────────────────────────────────────────────────────

/// Access to the process-wide time dilation factor.
pub trait TimeDilation {
    fn dilation(&self) -> f32;
    fn set_dilation(&mut self, factor: f32);
}

impl TimeDilation for Time<Virtual> {
    fn dilation(&self) -> f32 {
        self.relative_speed()
    }

    fn set_dilation(&mut self, factor: f32) {
        self.set_relative_speed(factor);
    }
}

/// Manual slow-motion toggle; no timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlowMotion {
    pub active: bool,
}

impl SlowMotion {
    /// Flip the toggle, apply the matching dilation, and return the sound to
    /// play.  Turning off always restores a dilation of exactly 1.0.
    pub fn toggle(&mut self, time: &mut impl TimeDilation, dilation: f32) -> SoundCue {
        self.active = !self.active;
        if self.active {
            time.set_dilation(dilation);
            SoundCue::SlowMotionBegin
        } else {
            time.set_dilation(1.0);
            SoundCue::SlowMotionEnd
        }
    }
}

// ── Possession link ───────────────────────────────────────────────────────────

/// Why a drone possession request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossessionRejected {
    Airborne,
    /// A drone from this character is still alive.
    LinkOpen,
    CoolingDown,
}

/// The character's exclusive, time-boxed link to a spawned drone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PossessionLink {
    pub drone: Option<Entity>,
    /// Set between the drone's return and the end of the ability cooldown.
    pub cooling: bool,
}

impl PossessionLink {
    pub fn can_begin(&self, airborne: bool) -> Result<(), PossessionRejected> {
        if airborne {
            Err(PossessionRejected::Airborne)
        } else if self.drone.is_some() {
            Err(PossessionRejected::LinkOpen)
        } else if self.cooling {
            Err(PossessionRejected::CoolingDown)
        } else {
            Ok(())
        }
    }

    /// Record the spawned drone and arm the return timer.
    pub fn begin(&mut self, drone: Entity, timers: &mut AbilityTimers, window: f32) {
        self.drone = Some(drone);
        timers.schedule(TimerToken::DroneReturn, window);
    }

    /// Close the link and start the re-activation cooldown.  Returns the drone
    /// that must be despawned, if any.
    pub fn end(&mut self, timers: &mut AbilityTimers, cooldown: f32) -> Option<Entity> {
        let drone = self.drone.take()?;
        if cooldown > 0.0 {
            self.cooling = true;
            timers.schedule(TimerToken::DroneAbilityCooldown, cooldown);
        }
        Some(drone)
    }
}
