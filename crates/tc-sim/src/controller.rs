//! Cascade controller: owns the tank/pipe arena and runs the tick.

use crate::error::{SimError, SimResult};
use crate::pipe::{Pipe, PipeSnapshot};
use crate::stage::{Gate, Stage, StageOutcome};
use crate::tank::{Tank, TankSnapshot};
use serde::{Deserialize, Serialize};
use tc_core::{PipeId, Real, TankId};
use tracing::{debug, info, trace};

/// Ordered chain of tanks connected by pipes.
///
/// Stages are evaluated in insertion order, and each stage sees the
/// quantities left behind by the stages before it in the same tick. All
/// tanks and pipes live here; everything else refers to them by id.
#[derive(Debug, Clone)]
pub struct CascadeController {
    pub(crate) tanks: Vec<Tank>,
    pub(crate) pipes: Vec<Pipe>,
    pub(crate) stages: Vec<Stage>,
    pub(crate) transfer_rate: Real,
    pub(crate) ticks: u64,
}

/// Per-stage results of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    pub stages: Vec<StageOutcome>,
}

impl TickReport {
    /// Total volume moved across all stages.
    pub fn moved(&self) -> Real {
        self.stages.iter().map(StageOutcome::moved).sum()
    }

    /// True if any stage flowed this tick.
    pub fn any_flowing(&self) -> bool {
        self.stages.iter().any(StageOutcome::is_flowing)
    }
}

/// Read-only view of the whole cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSnapshot {
    pub ticks: u64,
    pub transfer_rate: Real,
    pub total_volume: Real,
    pub tanks: Vec<TankSnapshot>,
    pub pipes: Vec<PipeSnapshot>,
}

impl CascadeController {
    /// Run every stage once, in order.
    ///
    /// Never fails: an empty source, a full destination or a reached
    /// setpoint just means that stage moves nothing this tick.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let mut outcomes = Vec::with_capacity(self.stages.len());

        for (i, stage) in self.stages.iter().enumerate() {
            let src = stage.source.slot();
            let dst = stage.dest.slot();

            let outcome = match stage.gate(&self.tanks[src], &self.tanks[dst]) {
                Gate::Open => {
                    // One bound shared by both sides keeps the stage volume-neutral.
                    let amount = self
                        .transfer_rate
                        .min(self.tanks[src].quantity())
                        .min(self.tanks[dst].free_space());
                    let removed = self.tanks[src].withdraw(amount);
                    let accepted = self.tanks[dst].deposit(removed);
                    debug_assert_eq!(removed, accepted);
                    StageOutcome::Flowing { moved: accepted }
                }
                Gate::Closed(outcome) => outcome,
            };

            self.pipes[stage.pipe.slot()].set_flow_state(outcome.is_flowing());
            trace!(tick = self.ticks, stage = i, ?outcome, "stage evaluated");
            outcomes.push(outcome);
        }

        let report = TickReport {
            tick: self.ticks,
            stages: outcomes,
        };
        debug!(
            tick = report.tick,
            moved = report.moved(),
            total_volume = self.total_volume(),
            "tick complete"
        );
        report
    }

    /// Run `n` ticks, returning the last report (if any).
    pub fn run(&mut self, n: usize) -> Option<TickReport> {
        (0..n).map(|_| self.tick()).last()
    }

    /// Manually fill a tank to capacity.
    pub fn force_fill(&mut self, id: TankId) -> SimResult<()> {
        let tank = self.tank_mut(id)?;
        tank.force_fill();
        info!(tank = tank.name(), quantity = tank.quantity(), "manual fill");
        Ok(())
    }

    /// Manually drain a tank to zero.
    pub fn force_drain(&mut self, id: TankId) -> SimResult<()> {
        let tank = self.tank_mut(id)?;
        tank.force_drain();
        info!(tank = tank.name(), "manual drain");
        Ok(())
    }

    /// Store or clear a tank's target level.
    pub fn set_target(&mut self, id: TankId, percent: Option<Real>) -> SimResult<()> {
        let tank = self.tank_mut(id)?;
        tank.set_target(percent)?;
        info!(tank = tank.name(), ?percent, "target level changed");
        Ok(())
    }

    pub fn tank(&self, id: TankId) -> SimResult<&Tank> {
        self.tanks.get(id.slot()).ok_or(SimError::UnknownTank { id })
    }

    fn tank_mut(&mut self, id: TankId) -> SimResult<&mut Tank> {
        self.tanks
            .get_mut(id.slot())
            .ok_or(SimError::UnknownTank { id })
    }

    /// Look up a tank by its display name.
    pub fn tank_id(&self, name: &str) -> Option<TankId> {
        self.tanks
            .iter()
            .position(|t| t.name() == name)
            .map(|i| TankId::from_index(i as u32))
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(id.slot())
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn transfer_rate(&self) -> Real {
        self.transfer_rate
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sum of all tank quantities.
    pub fn total_volume(&self) -> Real {
        self.tanks.iter().map(Tank::quantity).sum()
    }

    pub fn snapshot(&self) -> CascadeSnapshot {
        CascadeSnapshot {
            ticks: self.ticks,
            transfer_rate: self.transfer_rate,
            total_volume: self.total_volume(),
            tanks: self
                .tanks
                .iter()
                .enumerate()
                .map(|(i, t)| t.snapshot(TankId::from_index(i as u32)))
                .collect(),
            pipes: self
                .pipes
                .iter()
                .enumerate()
                .map(|(i, p)| p.snapshot(PipeId::from_index(i as u32)))
                .collect(),
        }
    }
}
