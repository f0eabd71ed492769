//! Manual operations scheduled from the command line.
//!
//! Syntax:
//! - fill:   `TANK@TICK`
//! - drain:  `TANK@TICK`
//! - target: `TANK=PCT@TICK`, where `PCT` may be `none` to clear the setpoint

use tc_core::TankId;
use tc_project::CompiledCascade;
use tc_sim::CascadeController;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ManualAction {
    Fill,
    Drain,
    Target(Option<f64>),
}

/// A manual action applied once the cascade has run `at_tick` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledOp {
    pub tank: String,
    pub at_tick: u64,
    pub action: ManualAction,
}

fn split_at_tick(s: &str) -> Result<(&str, u64), String> {
    let (head, tick) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected '<tank>@<tick>', got '{s}'"))?;
    let tick = tick
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid tick in '{s}': {e}"))?;
    if head.trim().is_empty() {
        return Err(format!("missing tank id in '{s}'"));
    }
    Ok((head.trim(), tick))
}

pub fn parse_fill(s: &str) -> Result<ScheduledOp, String> {
    let (tank, at_tick) = split_at_tick(s)?;
    Ok(ScheduledOp {
        tank: tank.to_string(),
        at_tick,
        action: ManualAction::Fill,
    })
}

pub fn parse_drain(s: &str) -> Result<ScheduledOp, String> {
    let (tank, at_tick) = split_at_tick(s)?;
    Ok(ScheduledOp {
        tank: tank.to_string(),
        at_tick,
        action: ManualAction::Drain,
    })
}

pub fn parse_target(s: &str) -> Result<ScheduledOp, String> {
    let (head, at_tick) = split_at_tick(s)?;
    let (tank, pct) = head
        .split_once('=')
        .ok_or_else(|| format!("expected '<tank>=<percent>@<tick>', got '{s}'"))?;
    let percent = match pct.trim() {
        p if p.eq_ignore_ascii_case("none") => None,
        p => Some(
            p.parse::<f64>()
                .map_err(|e| format!("invalid percent in '{s}': {e}"))?,
        ),
    };
    Ok(ScheduledOp {
        tank: tank.trim().to_string(),
        at_tick,
        action: ManualAction::Target(percent),
    })
}

/// Pending operations with resolved tank ids, in application order.
#[derive(Debug, Default)]
pub struct OpQueue {
    ops: Vec<(TankId, ScheduledOp)>,
    next: usize,
}

impl OpQueue {
    /// Resolve every tank id up front so a typo fails before the run starts.
    pub fn resolve(mut ops: Vec<ScheduledOp>, compiled: &CompiledCascade) -> CliResult<Self> {
        // Stable: operations sharing a tick keep their command-line order.
        ops.sort_by_key(|op| op.at_tick);
        let ops = ops
            .into_iter()
            .map(|op| -> CliResult<(TankId, ScheduledOp)> {
                Ok((compiled.tank_id(&op.tank)?, op))
            })
            .collect::<CliResult<Vec<_>>>()?;
        Ok(Self { ops, next: 0 })
    }

    /// Apply every operation due once `controller` has run its current ticks.
    pub fn apply_due(&mut self, controller: &mut CascadeController) -> CliResult<usize> {
        let ticks = controller.ticks();
        let mut applied = 0;
        while let Some((id, op)) = self.ops.get(self.next) {
            if op.at_tick > ticks {
                break;
            }
            match op.action {
                ManualAction::Fill => controller.force_fill(*id),
                ManualAction::Drain => controller.force_drain(*id),
                ManualAction::Target(pct) => controller.set_target(*id, pct),
            }
            .map_err(CliError::from)?;
            self.next += 1;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn is_empty(&self) -> bool {
        self.next >= self.ops.len()
    }
}
