//! Deferred one-shot timers keyed by token.
//!
//! Every ability that "flips a flag back after D seconds" arms a token on the
//! owning entity's [`AbilityTimers`] component.  The per-entity timer system
//! ticks the component once per frame with virtual (time-dilated) seconds and
//! dispatches each expired token to its handler on the same thread.
//!
//! Semantics:
//! - at most one pending timer per token; [`AbilityTimers::schedule`] on an
//!   armed token replaces it (the old callback never fires)
//! - timers fire once and are removed when they expire
//! - [`AbilityTimers::tick`] returns expired tokens in deadline order, each
//!   with how far past its deadline the frame ran, so a handler that re-arms
//!   a periodic timer can keep the period exact

use bevy::prelude::*;

/// Identifies what a pending timer will do when it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerToken {
    /// Character dash becomes ready again.
    DashCooldown,
    /// Drone boost becomes ready again.
    BoostCooldown,
    /// Automatic fire may shoot again.
    AutoFireReset,
    /// Crosshair shooting factor stops growing.
    ShotSpread,
    /// Possession window ends; control returns to the character.
    DroneReturn,
    /// Drone ability becomes ready again after a possession window.
    DroneAbilityCooldown,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    token: TimerToken,
    /// Seconds left; the timer expires once this reaches zero.
    remaining: f32,
}

/// Pending deferred callbacks of one entity.
#[derive(Component, Debug, Default, Clone)]
pub struct AbilityTimers {
    pending: Vec<PendingTimer>,
}

impl AbilityTimers {
    /// Arm `token` to expire after `delay` seconds, replacing any pending one.
    pub fn schedule(&mut self, token: TimerToken, delay: f32) {
        let remaining = delay.max(0.0);
        if let Some(t) = self.pending.iter_mut().find(|t| t.token == token) {
            t.remaining = remaining;
        } else {
            self.pending.push(PendingTimer { token, remaining });
        }
    }

    /// Drop a pending timer.  Returns `true` if one was armed.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.token != token);
        self.pending.len() != before
    }

    #[inline]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|t| t.token == token)
    }

    /// Seconds until `token` expires, or `None` when it is not armed.
    pub fn remaining(&self, token: TimerToken) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.token == token)
            .map(|t| t.remaining)
    }

    /// Advance every pending timer by `dt` seconds and return the ones that
    /// expired as `(token, overshoot)`, earliest deadline first.  `overshoot`
    /// is the time elapsed past the deadline.  Expired timers are removed
    /// before this returns, so handlers may re-arm the same token.
    pub fn tick(&mut self, dt: f32) -> Vec<(TimerToken, f32)> {
        let dt = dt.max(0.0);
        let mut expired: Vec<PendingTimer> = Vec::new();
        self.pending.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                expired.push(*t);
                false
            } else {
                true
            }
        });
        expired.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        expired
            .into_iter()
            .map(|t| (t.token, -t.remaining))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(expired: Vec<(TimerToken, f32)>) -> Vec<TimerToken> {
        expired.into_iter().map(|(token, _)| token).collect()
    }

    #[test]
    fn timer_fires_once_after_delay() {
        let mut timers = AbilityTimers::default();
        timers.schedule(TimerToken::DashCooldown, 0.3);
        assert!(timers.tick(0.1).is_empty());
        assert!(timers.tick(0.1).is_empty());
        let expired = timers.tick(0.15);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0, TimerToken::DashCooldown);
        assert!((expired[0].1 - 0.05).abs() < 1e-5);
        assert!(timers.tick(1.0).is_empty());
        assert!(!timers.is_pending(TimerToken::DashCooldown));
    }

    #[test]
    fn rearming_replaces_pending_timer() {
        let mut timers = AbilityTimers::default();
        timers.schedule(TimerToken::ShotSpread, 0.05);
        timers.tick(0.04);
        timers.schedule(TimerToken::ShotSpread, 0.05);
        assert!(timers.tick(0.02).is_empty(), "old deadline must not fire");
        assert_eq!(tokens(timers.tick(0.04)), vec![TimerToken::ShotSpread]);
    }

    #[test]
    fn cancel_prevents_expiry() {
        let mut timers = AbilityTimers::default();
        timers.schedule(TimerToken::DroneReturn, 1.0);
        assert!(timers.cancel(TimerToken::DroneReturn));
        assert!(!timers.cancel(TimerToken::DroneReturn));
        assert!(timers.tick(2.0).is_empty());
    }

    #[test]
    fn expired_tokens_are_in_deadline_order() {
        let mut timers = AbilityTimers::default();
        timers.schedule(TimerToken::DashCooldown, 0.5);
        timers.schedule(TimerToken::AutoFireReset, 0.1);
        timers.schedule(TimerToken::ShotSpread, 0.3);
        assert_eq!(
            tokens(timers.tick(1.0)),
            vec![
                TimerToken::AutoFireReset,
                TimerToken::ShotSpread,
                TimerToken::DashCooldown
            ]
        );
    }
}
