//! The stock four-tank training layout.
//!
//! A wide head tank on top feeds two tall silos, which feed a wide mixer at
//! the bottom whose target level starts at 60%. Drawing-surface units, `y`
//! pointing down.

use crate::schema::{CascadeDef, GeometryDef, Project, StageDef, TankDef};

impl Project {
    pub fn reference() -> Self {
        Project {
            version: crate::LATEST_VERSION,
            name: "Four-tank cascade".to_string(),
            cascade: CascadeDef {
                transfer_rate: tc_sim::DEFAULT_TRANSFER_RATE,
                tick_period: tc_sim::DEFAULT_TICK_PERIOD,
                tanks: vec![
                    tank("t1", "T1 Main", (300.0, 30.0, 400.0, 80.0), 100.0, None),
                    tank("t2", "T2 Silo A", (150.0, 200.0, 100.0, 200.0), 0.0, None),
                    tank("t3", "T3 Silo B", (750.0, 200.0, 100.0, 200.0), 0.0, None),
                    tank("t4", "T4 Mixer", (300.0, 480.0, 400.0, 80.0), 0.0, Some(60.0)),
                ],
                stages: vec![
                    // Head outlet (500,110) down, left to silo A, down into its top.
                    stage("p1", "t1", "t2", &[[500.0, 150.0], [200.0, 150.0]]),
                    // Silo A bottom (200,400) out to the side, up and over into silo B.
                    stage(
                        "p2",
                        "t2",
                        "t3",
                        &[
                            [200.0, 410.0],
                            [260.0, 410.0],
                            [260.0, 180.0],
                            [800.0, 180.0],
                        ],
                    ),
                    // Silo B bottom (800,400) down, left to the mixer, down into its top.
                    stage("p3", "t3", "t4", &[[800.0, 420.0], [500.0, 420.0]]),
                ],
            },
        }
    }
}

fn tank(
    id: &str,
    name: &str,
    (x, y, width, height): (f64, f64, f64, f64),
    initial_quantity: f64,
    target_level_percent: Option<f64>,
) -> TankDef {
    TankDef {
        id: id.to_string(),
        name: name.to_string(),
        capacity: 100.0,
        initial_quantity,
        target_level_percent,
        geometry: GeometryDef {
            x,
            y,
            width,
            height,
        },
    }
}

fn stage(id: &str, from: &str, to: &str, waypoints: &[[f64; 2]]) -> StageDef {
    StageDef {
        id: id.to_string(),
        name: None,
        from_tank_id: from.to_string(),
        to_tank_id: to.to_string(),
        source_threshold: None,
        waypoints: Some(waypoints.to_vec()),
    }
}
