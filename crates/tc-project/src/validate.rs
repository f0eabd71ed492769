//! Project validation logic.

use crate::schema::{CascadeDef, GeometryDef, Project, StageDef, TankDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cascade '{name}' has no stages")]
    NoStages { name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    validate_cascade(&project.name, &project.cascade)
}

fn validate_cascade(name: &str, cascade: &CascadeDef) -> Result<(), ValidationError> {
    if !cascade.transfer_rate.is_finite() || cascade.transfer_rate <= 0.0 {
        return Err(invalid(
            "transfer_rate",
            cascade.transfer_rate,
            "must be positive and finite",
        ));
    }
    if !cascade.tick_period.is_finite() || cascade.tick_period <= 0.0 {
        return Err(invalid(
            "tick_period",
            cascade.tick_period,
            "must be positive and finite",
        ));
    }

    let mut tank_ids = HashSet::new();
    for tank in &cascade.tanks {
        if !tank_ids.insert(tank.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: tank.id.clone(),
                context: "tanks".to_string(),
            });
        }
        validate_tank(tank)?;
    }

    if cascade.stages.is_empty() {
        return Err(ValidationError::NoStages {
            name: name.to_string(),
        });
    }

    let mut stage_ids = HashSet::new();
    for stage in &cascade.stages {
        if !stage_ids.insert(stage.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: stage.id.clone(),
                context: "stages".to_string(),
            });
        }
        validate_stage(stage, &tank_ids)?;
    }

    Ok(())
}

fn validate_tank(tank: &TankDef) -> Result<(), ValidationError> {
    if !tank.capacity.is_finite() || tank.capacity <= 0.0 {
        return Err(invalid(
            format!("tank '{}' capacity", tank.id),
            tank.capacity,
            "must be positive and finite",
        ));
    }

    let q = tank.initial_quantity;
    if !q.is_finite() || q < 0.0 || q > tank.capacity {
        return Err(invalid(
            format!("tank '{}' initial_quantity", tank.id),
            q,
            "must lie within [0, capacity]",
        ));
    }

    if let Some(pct) = tank.target_level_percent
        && (!pct.is_finite() || !(0.0..=100.0).contains(&pct))
    {
        return Err(invalid(
            format!("tank '{}' target_level_percent", tank.id),
            pct,
            "must lie within [0, 100]",
        ));
    }

    validate_geometry(&tank.id, &tank.geometry)
}

fn validate_geometry(tank_id: &str, g: &GeometryDef) -> Result<(), ValidationError> {
    for (field, value) in [("x", g.x), ("y", g.y)] {
        if !value.is_finite() {
            return Err(invalid(
                format!("tank '{tank_id}' geometry.{field}"),
                value,
                "must be finite",
            ));
        }
    }
    for (field, value) in [("width", g.width), ("height", g.height)] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                format!("tank '{tank_id}' geometry.{field}"),
                value,
                "must be non-negative and finite",
            ));
        }
    }
    Ok(())
}

fn validate_stage(stage: &StageDef, tank_ids: &HashSet<&str>) -> Result<(), ValidationError> {
    for (context, id) in [
        ("stage from_tank_id", &stage.from_tank_id),
        ("stage to_tank_id", &stage.to_tank_id),
    ] {
        if !tank_ids.contains(id.as_str()) {
            return Err(ValidationError::MissingReference {
                id: id.clone(),
                context: format!("{context} of '{}'", stage.id),
            });
        }
    }

    if stage.from_tank_id == stage.to_tank_id {
        return Err(ValidationError::InvalidValue {
            field: format!("stage '{}' to_tank_id", stage.id),
            value: stage.to_tank_id.clone(),
            reason: "a stage cannot feed its own source".to_string(),
        });
    }

    if let Some(t) = stage.source_threshold
        && (!t.is_finite() || t < 0.0)
    {
        return Err(invalid(
            format!("stage '{}' source_threshold", stage.id),
            t,
            "must be non-negative and finite",
        ));
    }

    if let Some(points) = &stage.waypoints
        && points.iter().flatten().any(|v| !v.is_finite())
    {
        return Err(ValidationError::InvalidValue {
            field: format!("stage '{}' waypoints", stage.id),
            value: format!("{points:?}"),
            reason: "all coordinates must be finite".to_string(),
        });
    }

    Ok(())
}

fn invalid(field: impl Into<String>, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::reference()
    }

    #[test]
    fn reference_is_valid() {
        validate_project(&project()).unwrap();
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut p = project();
        p.version = 99;
        assert_eq!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        );
    }

    #[test]
    fn rejects_duplicate_tank() {
        let mut p = project();
        let dup = p.cascade.tanks[0].clone();
        p.cascade.tanks.push(dup);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_missing_tank_reference() {
        let mut p = project();
        p.cascade.stages[0].to_tank_id = "ghost".to_string();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { id, .. }) if id == "ghost"
        ));
    }

    #[test]
    fn rejects_bad_numbers() {
        let mut p = project();
        p.cascade.transfer_rate = 0.0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.cascade.tanks[0].capacity = -5.0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.cascade.tanks[0].initial_quantity = 101.0;
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.cascade.tanks[3].target_level_percent = Some(120.0);
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.cascade.stages[1].source_threshold = Some(-1.0);
        assert!(validate_project(&p).is_err());

        let mut p = project();
        p.cascade.tanks[1].geometry.width = f64::NAN;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn rejects_self_loop_and_empty_chain() {
        let mut p = project();
        p.cascade.stages[0].to_tank_id = p.cascade.stages[0].from_tank_id.clone();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut p = project();
        p.cascade.stages.clear();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::NoStages { .. })
        ));
    }
}
