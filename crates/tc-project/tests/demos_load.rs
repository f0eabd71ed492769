//! The shipped demo configuration must load, match the built-in reference
//! layout, and reproduce the reference first-tick behaviour.

use std::path::PathBuf;
use tc_project::{Project, compile_cascade, load_yaml};

fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn reference_demo_matches_builtin() {
    let project = load_yaml(&demo_path("reference.yaml")).unwrap();
    assert_eq!(project, Project::reference());
}

#[test]
fn reference_demo_first_tick() {
    let project = load_yaml(&demo_path("reference.yaml")).unwrap();
    let mut compiled = compile_cascade(&project.cascade).unwrap();
    let t1 = compiled.tank_id("t1").unwrap();
    let t2 = compiled.tank_id("t2").unwrap();

    let report = compiled.controller.tick();
    let flowing: Vec<bool> = report.stages.iter().map(|s| s.is_flowing()).collect();
    assert_eq!(flowing, vec![true, false, false]);

    let c = &compiled.controller;
    assert!((c.tank(t1).unwrap().quantity() - 99.2).abs() < 1e-9);
    assert!((c.tank(t2).unwrap().quantity() - 0.8).abs() < 1e-9);
}

#[test]
fn reference_demo_session_runs_to_setpoint() {
    let project = load_yaml(&demo_path("reference.yaml")).unwrap();
    let compiled = compile_cascade(&project.cascade).unwrap();
    let t4 = compiled.tank_id("t4").unwrap();
    let mut session = compiled.into_session().unwrap();

    session.start(0.0);
    // 60 seconds of 20 ms ticks.
    let mut now = 0.0;
    while now < 60_000.0 {
        now += 100.0;
        session.advance_to(now);
    }

    let c = session.controller();
    assert_eq!(c.ticks(), 3_000);
    let q4 = c.tank(t4).unwrap().quantity();
    assert!((60.0..60.8).contains(&q4), "mixer settled at {q4}");
    assert!((c.total_volume() - 100.0).abs() < 1e-9);
}
