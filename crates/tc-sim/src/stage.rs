//! One source-to-destination transfer step and its eligibility gate.

use crate::tank::{EMPTY_TOLERANCE, Tank};
use serde::{Deserialize, Serialize};
use tc_core::{PipeId, Real, TankId};

/// Source buffer required by stages after the first before they admit flow.
pub const DOWNSTREAM_BUFFER: Real = 5.0;

/// Default source threshold for the stage at `position` in the chain.
///
/// The head stage only needs a non-empty source; later stages hold back
/// until their source carries a small buffer, which keeps the flow
/// indicator from chattering when a stage is nearly drained.
pub fn default_source_threshold(position: usize) -> Real {
    if position == 0 {
        EMPTY_TOLERANCE
    } else {
        DOWNSTREAM_BUFFER
    }
}

/// A transfer step evaluated once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub source: TankId,
    pub dest: TankId,
    pub pipe: PipeId,
    /// The source must hold strictly more than this for the stage to flow.
    pub source_threshold: Real,
}

/// Why a stage did or did not move liquid during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Both gates passed; `moved` may be tiny but the pipe counts as flowing.
    Flowing { moved: Real },
    /// Source at or below the stage threshold.
    SourceBelowThreshold,
    /// Destination without a setpoint is within tolerance of capacity.
    DestinationFull,
    /// Destination has reached its target level.
    SetpointReached,
}

impl StageOutcome {
    pub fn is_flowing(&self) -> bool {
        matches!(self, StageOutcome::Flowing { .. })
    }

    pub fn moved(&self) -> Real {
        match self {
            StageOutcome::Flowing { moved } => *moved,
            _ => 0.0,
        }
    }
}

/// Gate decision before any quantity changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Gate {
    Open,
    Closed(StageOutcome),
}

impl Stage {
    /// Evaluate the eligibility gate against the current tank state.
    ///
    /// A destination setpoint replaces the full check entirely: the stage
    /// admits flow only while the destination is below its target quantity.
    pub(crate) fn gate(&self, source: &Tank, dest: &Tank) -> Gate {
        match dest.target_quantity() {
            Some(limit) if dest.quantity() >= limit => {
                return Gate::Closed(StageOutcome::SetpointReached);
            }
            None if dest.is_full() => return Gate::Closed(StageOutcome::DestinationFull),
            _ => {}
        }
        if source.quantity() > self.source_threshold {
            Gate::Open
        } else {
            Gate::Closed(StageOutcome::SourceBelowThreshold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::TankGeometry;

    fn tank(quantity: Real) -> Tank {
        Tank::new("T", 100.0, TankGeometry::default())
            .unwrap()
            .with_quantity(quantity)
            .unwrap()
    }

    fn stage(threshold: Real) -> Stage {
        Stage {
            source: TankId::from_index(0),
            dest: TankId::from_index(1),
            pipe: PipeId::from_index(0),
            source_threshold: threshold,
        }
    }

    #[test]
    fn default_thresholds_by_position() {
        assert_eq!(default_source_threshold(0), EMPTY_TOLERANCE);
        assert_eq!(default_source_threshold(1), DOWNSTREAM_BUFFER);
        assert_eq!(default_source_threshold(7), DOWNSTREAM_BUFFER);
    }

    #[test]
    fn head_stage_matches_is_empty() {
        let s = stage(EMPTY_TOLERANCE);
        for q in [0.0, 0.05, 0.1, 0.11, 3.0] {
            let src = tank(q);
            let open = s.gate(&src, &tank(0.0)) == Gate::Open;
            assert_eq!(open, !src.is_empty(), "quantity {q}");
        }
    }

    #[test]
    fn downstream_stage_needs_buffer() {
        let s = stage(DOWNSTREAM_BUFFER);
        assert_eq!(
            s.gate(&tank(5.0), &tank(0.0)),
            Gate::Closed(StageOutcome::SourceBelowThreshold)
        );
        assert_eq!(s.gate(&tank(5.01), &tank(0.0)), Gate::Open);
    }

    #[test]
    fn full_destination_blocks_without_setpoint() {
        let s = stage(EMPTY_TOLERANCE);
        assert_eq!(
            s.gate(&tank(50.0), &tank(99.95)),
            Gate::Closed(StageOutcome::DestinationFull)
        );
    }

    #[test]
    fn setpoint_replaces_full_check() {
        let s = stage(EMPTY_TOLERANCE);
        let dest = tank(59.5).with_target(Some(60.0)).unwrap();
        assert_eq!(s.gate(&tank(50.0), &dest), Gate::Open);

        let dest = tank(60.0).with_target(Some(60.0)).unwrap();
        assert_eq!(
            s.gate(&tank(50.0), &dest),
            Gate::Closed(StageOutcome::SetpointReached)
        );

        // With a 100% setpoint the tolerance-based full check no longer applies.
        let dest = tank(99.95).with_target(Some(100.0)).unwrap();
        assert_eq!(s.gate(&tank(50.0), &dest), Gate::Open);
    }

    #[test]
    fn outcome_helpers() {
        assert!(StageOutcome::Flowing { moved: 0.0 }.is_flowing());
        assert_eq!(StageOutcome::Flowing { moved: 0.8 }.moved(), 0.8);
        assert_eq!(StageOutcome::SetpointReached.moved(), 0.0);
        assert!(!StageOutcome::DestinationFull.is_flowing());
    }
}
