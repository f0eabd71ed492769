//! Fixed-period tick scheduling for hosts.
//!
//! The host owns the real clock (a GUI timer, a sleep loop, a test) and
//! reports the current time; the session decides how many ticks fell due
//! and runs them while the simulation is started.

use crate::controller::{CascadeController, TickReport};
use crate::error::{SimError, SimResult};
use tc_core::Real;
use tracing::{info, warn};

/// Default tick period, in host time units (milliseconds for the CLI).
pub const DEFAULT_TICK_PERIOD: Real = 20.0;

/// Backlog beyond which a stalled host drops missed ticks instead of replaying them.
pub const MAX_CATCH_UP_TICKS: usize = 1_000;

/// Tracks when the next tick is due.
#[derive(Debug, Clone, PartialEq)]
pub struct TickClock {
    period: Real,
    next_tick_time: Real,
}

impl TickClock {
    /// Create a clock whose first tick falls one period after `initial_time`.
    pub fn new(period: Real, initial_time: Real) -> SimResult<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(SimError::InvalidArg {
                what: "tick period must be finite and positive",
            });
        }
        Ok(Self {
            period,
            next_tick_time: initial_time + period,
        })
    }

    pub fn period(&self) -> Real {
        self.period
    }

    /// Returns `true` if `current_time >= next_tick_time`.
    pub fn is_due(&self, current_time: Real) -> bool {
        current_time >= self.next_tick_time
    }

    /// Move to the following tick time.
    pub fn advance(&mut self) {
        self.next_tick_time += self.period;
    }

    pub fn reset(&mut self, current_time: Real) {
        self.next_tick_time = current_time + self.period;
    }

    pub fn time_until_tick(&self, current_time: Real) -> Real {
        (self.next_tick_time - current_time).max(0.0)
    }
}

/// A controller plus start/stop state and a tick clock.
#[derive(Debug, Clone)]
pub struct Session {
    controller: CascadeController,
    clock: TickClock,
    running: bool,
}

impl Session {
    /// Wrap a controller; the session starts stopped.
    pub fn new(controller: CascadeController, period: Real) -> SimResult<Self> {
        Ok(Self {
            controller,
            clock: TickClock::new(period, 0.0)?,
            running: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn start(&mut self, now: Real) {
        if !self.running {
            self.running = true;
            self.clock.reset(now);
            info!(now, period = self.clock.period(), "simulation started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!(ticks = self.controller.ticks(), "simulation stopped");
        }
    }

    /// Flip between started and stopped; returns the new running state.
    pub fn toggle(&mut self, now: Real) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start(now);
        }
        self.running
    }

    /// Run every tick that fell due up to `now`. Does nothing while stopped.
    ///
    /// Returns the reports of the ticks that ran, oldest first.
    pub fn advance_to(&mut self, now: Real) -> Vec<TickReport> {
        self.advance_at_most(now, usize::MAX)
    }

    /// Like [`Session::advance_to`], but runs no more than `limit` ticks.
    ///
    /// Ticks beyond the limit stay due for the next call.
    pub fn advance_at_most(&mut self, now: Real, limit: usize) -> Vec<TickReport> {
        let mut reports = Vec::new();
        if !self.running {
            return reports;
        }
        while reports.len() < limit && self.clock.is_due(now) {
            if reports.len() == MAX_CATCH_UP_TICKS {
                warn!(now, dropped_after = MAX_CATCH_UP_TICKS, "tick backlog dropped");
                self.clock.reset(now);
                break;
            }
            reports.push(self.controller.tick());
            self.clock.advance();
        }
        reports
    }

    /// Run one tick immediately, regardless of the running state.
    pub fn step(&mut self) -> TickReport {
        self.controller.tick()
    }

    pub fn controller(&self) -> &CascadeController {
        &self.controller
    }

    /// Mutable access for manual operations between ticks.
    pub fn controller_mut(&mut self) -> &mut CascadeController {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CascadeBuilder;
    use crate::tank::Tank;
    use tc_core::TankGeometry;

    fn session() -> Session {
        let mut b = CascadeBuilder::new();
        let a = b.add_tank(
            Tank::new("A", 100.0, TankGeometry::default())
                .unwrap()
                .with_quantity(100.0)
                .unwrap(),
        );
        let z = b.add_tank(Tank::new("Z", 100.0, TankGeometry::default()).unwrap());
        b.add_stage("A->Z", a, z).unwrap();
        Session::new(b.build().unwrap(), DEFAULT_TICK_PERIOD).unwrap()
    }

    #[test]
    fn clock_basic() {
        let mut clock = TickClock::new(20.0, 0.0).unwrap();
        assert!(!clock.is_due(0.0));
        assert!(clock.is_due(20.0));
        clock.advance();
        assert!(!clock.is_due(20.0));
        assert!(clock.is_due(40.0));
        assert_eq!(clock.time_until_tick(30.0), 10.0);
        assert_eq!(clock.time_until_tick(50.0), 0.0);
    }

    #[test]
    fn clock_rejects_bad_period() {
        assert!(TickClock::new(0.0, 0.0).is_err());
        assert!(TickClock::new(-20.0, 0.0).is_err());
        assert!(TickClock::new(Real::INFINITY, 0.0).is_err());
    }

    #[test]
    fn stopped_session_never_ticks() {
        let mut s = session();
        assert!(s.advance_to(1_000.0).is_empty());
        assert_eq!(s.controller().ticks(), 0);
    }

    #[test]
    fn running_session_runs_due_ticks() {
        let mut s = session();
        s.start(100.0);
        assert!(s.advance_to(119.0).is_empty());
        assert_eq!(s.advance_to(165.0).len(), 3);
        assert_eq!(s.controller().ticks(), 3);
        assert!(!s.toggle(170.0));
        assert!(s.advance_to(500.0).is_empty());
        assert!(s.toggle(500.0));
        assert_eq!(s.advance_to(520.0).len(), 1);
    }

    #[test]
    fn backlog_is_capped() {
        let mut s = session();
        s.start(0.0);
        let reports = s.advance_to(DEFAULT_TICK_PERIOD * 5_000.0);
        assert_eq!(reports.len(), MAX_CATCH_UP_TICKS);
        assert!(!s.clock().is_due(DEFAULT_TICK_PERIOD * 5_000.0));
    }

    #[test]
    fn limited_advance_leaves_rest_due() {
        let mut s = session();
        s.start(0.0);
        assert_eq!(s.advance_at_most(100.0, 2).len(), 2);
        assert!(s.clock().is_due(100.0));
        assert_eq!(s.advance_at_most(100.0, 10).len(), 3);
        assert_eq!(s.controller().ticks(), 5);
        assert!(s.advance_at_most(1_000.0, 0).is_empty());
    }

    #[test]
    fn step_ignores_running_state() {
        let mut s = session();
        let report = s.step();
        assert_eq!(report.tick, 1);
        assert!(report.any_flowing());
    }
}
