//! Text rendering of cascade snapshots.

use tc_sim::CascadeSnapshot;

/// One line per snapshot: tick, then each tank, then each pipe's flow flag.
pub fn render_line(snapshot: &CascadeSnapshot) -> String {
    let mut line = format!("tick {:>6}", snapshot.ticks);
    for tank in &snapshot.tanks {
        line.push_str(&format!(
            " | {} {:>6.2}/{:.0} ({:>5.1}%)",
            tank.name,
            tank.quantity,
            tank.capacity,
            tank.level * 100.0
        ));
        if let Some(target) = tank.target_level_percent {
            line.push_str(&format!(" -> {target:.0}%"));
        }
    }
    line.push_str(" |");
    for pipe in &snapshot.pipes {
        let state = if pipe.is_flowing { "flow" } else { "idle" };
        line.push_str(&format!(" {}={}", pipe.name, state));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_project::{Project, compile_cascade};

    #[test]
    fn renders_reference_after_first_tick() {
        let mut compiled = compile_cascade(&Project::reference().cascade).unwrap();
        compiled.controller.tick();
        let line = render_line(&compiled.controller.snapshot());

        assert!(line.starts_with("tick      1"));
        assert!(line.contains("T1 Main  99.20/100 ( 99.2%)"));
        assert!(line.contains("T2 Silo A   0.80/100 (  0.8%)"));
        assert!(line.contains("T4 Mixer   0.00/100 (  0.0%) -> 60%"));
        assert!(line.ends_with("p1=flow p2=idle p3=idle"));
    }
}
