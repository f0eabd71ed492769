//! Incremental cascade builder.

use crate::controller::CascadeController;
use crate::error::{SimError, SimResult};
use crate::pipe::Pipe;
use crate::stage::{Stage, default_source_threshold};
use crate::tank::Tank;
use tc_core::{PipeId, Point, Real, TankId, elbow_route, waypoint_route};
use tracing::debug;

/// Maximum volume moved per stage per tick unless configured otherwise.
pub const DEFAULT_TRANSFER_RATE: Real = 0.8;

/// Vertical drop of the default elbow route below the source outlet.
pub const DEFAULT_ROUTE_DROP: Real = 20.0;

/// Description of a stage to add.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    pub name: String,
    pub from: TankId,
    pub to: TankId,
    /// `None` picks the positional default.
    pub source_threshold: Option<Real>,
    /// Interior waypoints; `None` routes an elbow between the anchors.
    pub waypoints: Option<Vec<Point>>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, from: TankId, to: TankId) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            source_threshold: None,
            waypoints: None,
        }
    }

    pub fn source_threshold(mut self, threshold: Real) -> Self {
        self.source_threshold = Some(threshold);
        self
    }

    pub fn waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = Some(waypoints);
        self
    }
}

/// Builder for assembling a cascade.
///
/// Add tanks first, then stages in the order they should run each tick,
/// then call `build()` to validate and freeze the chain into a
/// [`CascadeController`].
#[derive(Debug)]
pub struct CascadeBuilder {
    tanks: Vec<Tank>,
    pipes: Vec<Pipe>,
    stages: Vec<Stage>,
    transfer_rate: Real,
}

impl Default for CascadeBuilder {
    fn default() -> Self {
        Self {
            tanks: Vec::new(),
            pipes: Vec::new(),
            stages: Vec::new(),
            transfer_rate: DEFAULT_TRANSFER_RATE,
        }
    }
}

impl CascadeBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tank and return its ID.
    pub fn add_tank(&mut self, tank: Tank) -> TankId {
        let id = TankId::from_index(self.tanks.len() as u32);
        self.tanks.push(tank);
        id
    }

    /// Add a stage with the default threshold and an elbow route.
    pub fn add_stage(
        &mut self,
        name: impl Into<String>,
        from: TankId,
        to: TankId,
    ) -> SimResult<PipeId> {
        self.add_stage_spec(StageSpec::new(name, from, to))
    }

    /// Add a stage and the pipe it drives. Stages run in insertion order.
    pub fn add_stage_spec(&mut self, spec: StageSpec) -> SimResult<PipeId> {
        let source = self.tanks.get(spec.from.slot()).ok_or_else(|| SimError::InvalidStage {
            what: format!("stage '{}' source tank {} does not exist", spec.name, spec.from),
        })?;
        let dest = self.tanks.get(spec.to.slot()).ok_or_else(|| SimError::InvalidStage {
            what: format!("stage '{}' destination tank {} does not exist", spec.name, spec.to),
        })?;
        if spec.from == spec.to {
            return Err(SimError::InvalidStage {
                what: format!("stage '{}' connects tank {} to itself", spec.name, spec.from),
            });
        }

        let threshold = spec
            .source_threshold
            .unwrap_or_else(|| default_source_threshold(self.stages.len()));
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(SimError::InvalidThreshold { threshold });
        }

        let (outlet, inlet) = (source.outlet_point(), dest.inlet_point());
        let route = match &spec.waypoints {
            Some(interior) => waypoint_route(outlet, interior, inlet)?,
            None => elbow_route(outlet, inlet, DEFAULT_ROUTE_DROP),
        };

        let pipe_id = PipeId::from_index(self.pipes.len() as u32);
        self.pipes.push(Pipe::new(spec.name, spec.from, spec.to, route));
        self.stages.push(Stage {
            source: spec.from,
            dest: spec.to,
            pipe: pipe_id,
            source_threshold: threshold,
        });
        Ok(pipe_id)
    }

    /// Set the per-stage transfer rate (validated in `build`).
    pub fn transfer_rate(mut self, rate: Real) -> Self {
        self.transfer_rate = rate;
        self
    }

    /// Validate and produce the controller.
    pub fn build(self) -> SimResult<CascadeController> {
        if !(self.transfer_rate.is_finite() && self.transfer_rate > 0.0) {
            return Err(SimError::InvalidTransferRate {
                rate: self.transfer_rate,
            });
        }
        if self.stages.is_empty() {
            return Err(SimError::EmptyCascade);
        }

        debug!(
            tanks = self.tanks.len(),
            stages = self.stages.len(),
            transfer_rate = self.transfer_rate,
            "cascade built"
        );

        Ok(CascadeController {
            tanks: self.tanks,
            pipes: self.pipes,
            stages: self.stages,
            transfer_rate: self.transfer_rate,
            ticks: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::DOWNSTREAM_BUFFER;
    use crate::tank::EMPTY_TOLERANCE;
    use tc_core::TankGeometry;

    fn tank(name: &str, x: Real) -> Tank {
        Tank::new(name, 100.0, TankGeometry::new(x, 0.0, 20.0, 50.0).unwrap()).unwrap()
    }

    #[test]
    fn builder_assigns_sequential_ids_and_thresholds() {
        let mut b = CascadeBuilder::new();
        let t1 = b.add_tank(tank("T1", 0.0));
        let t2 = b.add_tank(tank("T2", 100.0));
        let t3 = b.add_tank(tank("T3", 200.0));
        let p1 = b.add_stage("P1", t1, t2).unwrap();
        let p2 = b.add_stage("P2", t2, t3).unwrap();
        assert_eq!((t1.index(), t2.index(), t3.index()), (0, 1, 2));
        assert_eq!((p1.index(), p2.index()), (0, 1));

        let c = b.build().unwrap();
        assert_eq!(c.transfer_rate(), DEFAULT_TRANSFER_RATE);
        assert_eq!(c.stages()[0].source_threshold, EMPTY_TOLERANCE);
        assert_eq!(c.stages()[1].source_threshold, DOWNSTREAM_BUFFER);
    }

    #[test]
    fn default_route_is_elbow_between_anchors() {
        let mut b = CascadeBuilder::new();
        let t1 = b.add_tank(tank("T1", 0.0));
        let t2 = b.add_tank(tank("T2", 100.0));
        let p = b.add_stage("P1", t1, t2).unwrap();
        let c = b.build().unwrap();
        let route = c.pipe(p).unwrap().route();
        assert_eq!(route.first(), Some(&Point::new(10.0, 50.0)));
        assert_eq!(route[1], Point::new(10.0, 50.0 + DEFAULT_ROUTE_DROP));
        assert_eq!(route.last(), Some(&Point::new(110.0, 0.0)));
    }

    #[test]
    fn explicit_waypoints_and_threshold() {
        let mut b = CascadeBuilder::new();
        let t1 = b.add_tank(tank("T1", 0.0));
        let t2 = b.add_tank(tank("T2", 100.0));
        let spec = StageSpec::new("P1", t1, t2)
            .source_threshold(2.0)
            .waypoints(vec![Point::new(10.0, 60.0), Point::new(110.0, 60.0)]);
        let p = b.add_stage_spec(spec).unwrap();
        let c = b.build().unwrap();
        assert_eq!(c.pipe(p).unwrap().route().len(), 4);
        assert_eq!(c.stages()[0].source_threshold, 2.0);
    }

    #[test]
    fn rejects_bad_stages() {
        let mut b = CascadeBuilder::new();
        let t1 = b.add_tank(tank("T1", 0.0));
        let ghost = TankId::from_index(5);
        assert!(matches!(
            b.add_stage("P", t1, ghost),
            Err(SimError::InvalidStage { .. })
        ));
        assert!(matches!(
            b.add_stage("P", t1, t1),
            Err(SimError::InvalidStage { .. })
        ));
        let t2 = b.add_tank(tank("T2", 50.0));
        assert_eq!(
            b.add_stage_spec(StageSpec::new("P", t1, t2).source_threshold(-1.0)),
            Err(SimError::InvalidThreshold { threshold: -1.0 })
        );
    }

    #[test]
    fn rejects_bad_rate_and_empty_chain() {
        let mut b = CascadeBuilder::new();
        b.add_tank(tank("T1", 0.0));
        assert_eq!(b.build().unwrap_err(), SimError::EmptyCascade);

        for rate in [0.0, -0.8, Real::NAN] {
            let mut b = CascadeBuilder::new();
            let t1 = b.add_tank(tank("T1", 0.0));
            let t2 = b.add_tank(tank("T2", 50.0));
            b.add_stage("P1", t1, t2).unwrap();
            assert!(matches!(
                b.transfer_rate(rate).build(),
                Err(SimError::InvalidTransferRate { .. })
            ));
        }
    }
}
