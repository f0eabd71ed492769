//! Compilation of a `CascadeDef` into a runnable controller.

use std::collections::HashMap;
use tc_core::{PipeId, Point, TankGeometry, TankId};
use tc_sim::{CascadeBuilder, CascadeController, Session, StageSpec, Tank};
use tracing::debug;

use crate::schema::{CascadeDef, TankDef};
use crate::{ProjectError, ProjectResult};

/// Runtime representation of a compiled cascade.
#[derive(Debug, Clone)]
pub struct CompiledCascade {
    pub controller: CascadeController,
    pub tick_period: f64,
    pub tank_id_map: HashMap<String, TankId>,
    pub pipe_id_map: HashMap<String, PipeId>,
}

impl CompiledCascade {
    /// Resolve a configuration tank id.
    pub fn tank_id(&self, id: &str) -> ProjectResult<TankId> {
        self.tank_id_map
            .get(id)
            .copied()
            .ok_or_else(|| ProjectError::UnknownTank { id: id.to_string() })
    }

    /// Wrap the controller in a stopped session ticking at the configured period.
    pub fn into_session(self) -> ProjectResult<Session> {
        Ok(Session::new(self.controller, self.tick_period)?)
    }
}

/// Compile a cascade definition into runtime structures.
pub fn compile_cascade(def: &CascadeDef) -> ProjectResult<CompiledCascade> {
    let mut builder = CascadeBuilder::new();

    let mut tank_id_map = HashMap::new();
    for tank_def in &def.tanks {
        let tank_id = builder.add_tank(build_tank(tank_def)?);
        tank_id_map.insert(tank_def.id.clone(), tank_id);
    }

    let mut pipe_id_map = HashMap::new();
    for stage in &def.stages {
        let lookup = |id: &str| {
            tank_id_map
                .get(id)
                .copied()
                .ok_or_else(|| ProjectError::UnknownTank { id: id.to_string() })
        };
        let from = lookup(&stage.from_tank_id)?;
        let to = lookup(&stage.to_tank_id)?;

        let mut spec = StageSpec::new(stage.display_name(), from, to);
        if let Some(threshold) = stage.source_threshold {
            spec = spec.source_threshold(threshold);
        }
        if let Some(points) = &stage.waypoints {
            spec = spec.waypoints(points.iter().copied().map(Point::from).collect());
        }
        let pipe_id = builder.add_stage_spec(spec)?;
        pipe_id_map.insert(stage.id.clone(), pipe_id);
    }

    let controller = builder.transfer_rate(def.transfer_rate).build()?;
    debug!(
        tanks = tank_id_map.len(),
        stages = pipe_id_map.len(),
        "cascade compiled"
    );

    Ok(CompiledCascade {
        controller,
        tick_period: def.tick_period,
        tank_id_map,
        pipe_id_map,
    })
}

fn build_tank(def: &TankDef) -> ProjectResult<Tank> {
    let g = def.geometry;
    let geometry = TankGeometry::new(g.x, g.y, g.width, g.height).map_err(tc_sim::SimError::from)?;
    Ok(Tank::new(&def.name, def.capacity, geometry)?
        .with_quantity(def.initial_quantity)?
        .with_target(def.target_level_percent)?)
}
