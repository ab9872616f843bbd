//! Tick scheduler state.
//!
//! The engine never sleeps. It only records what the host timer should be
//! doing; the host polls `schedule()` and re-arms whenever `generation()`
//! changes. Every change bumps the generation, so a host callback armed for
//! an older schedule can be recognised and dropped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Schedule {
    /// No timer armed.
    #[default]
    Stopped,
    /// Tick every `period_ms`.
    Repeating { period_ms: f64 },
    /// Wait `delay_ms` once, then try the deferred level advance.
    AdvancePending { delay_ms: u64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickScheduler {
    schedule: Schedule,
    generation: u64,
}

impl TickScheduler {
    /// `base_delay / (tower_speed x multiplier)`.
    pub fn period_for(base_delay_ms: f64, tower_speed: f64, multiplier: f64) -> f64 {
        base_delay_ms / (tower_speed * multiplier)
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// The repeating period, if a repeating timer is armed.
    pub fn period_ms(&self) -> Option<f64> {
        match self.schedule {
            Schedule::Repeating { period_ms } => Some(period_ms),
            _ => None,
        }
    }

    /// Replace whatever is armed with a repeating timer. Returns the new
    /// generation.
    pub fn reschedule(&mut self, period_ms: f64) -> u64 {
        self.replace(Schedule::Repeating { period_ms })
    }

    /// Replace whatever is armed with a one-shot advance timer.
    pub fn defer_advance(&mut self, delay_ms: u64) -> u64 {
        self.replace(Schedule::AdvancePending { delay_ms })
    }

    /// Disarm. A no-op when already stopped.
    pub fn cancel(&mut self) {
        if self.schedule != Schedule::Stopped {
            self.replace(Schedule::Stopped);
        }
    }

    fn replace(&mut self, schedule: Schedule) -> u64 {
        self.schedule = schedule;
        self.generation += 1;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_scales_inversely_with_speed_and_multiplier() {
        assert_eq!(TickScheduler::period_for(300.0, 1.0, 1.0), 300.0);
        assert_eq!(TickScheduler::period_for(300.0, 1.0, 10.0), 30.0);
        assert_eq!(TickScheduler::period_for(300.0, 2.0, 100.0), 1.5);
        assert!((TickScheduler::period_for(300.0, 1.2, 1.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_change_bumps_generation() {
        let mut scheduler = TickScheduler::default();
        assert_eq!(scheduler.schedule(), Schedule::Stopped);

        let first = scheduler.reschedule(300.0);
        assert_eq!(scheduler.period_ms(), Some(300.0));
        let second = scheduler.reschedule(150.0);
        assert!(second > first);
        assert!(!scheduler.is_current(first));

        let third = scheduler.defer_advance(800);
        assert_eq!(scheduler.schedule(), Schedule::AdvancePending { delay_ms: 800 });
        assert_eq!(scheduler.period_ms(), None);

        scheduler.cancel();
        assert!(!scheduler.is_current(third));
        assert_eq!(scheduler.schedule(), Schedule::Stopped);
    }

    #[test]
    fn test_cancel_when_stopped_keeps_generation() {
        let mut scheduler = TickScheduler::default();
        scheduler.cancel();
        assert_eq!(scheduler.generation(), 0);
    }
}
