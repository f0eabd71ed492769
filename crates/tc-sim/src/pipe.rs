//! Directed flow link between two tanks.

use serde::{Deserialize, Serialize};
use tc_core::{PipeId, Point, Real, TankId, route_length};

/// A pipe from one tank to another.
///
/// The endpoints are indices into the controller's tank arena; the pipe
/// owns neither tank. `is_flowing` is recomputed by every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    name: String,
    from: TankId,
    to: TankId,
    route: Vec<Point>,
    is_flowing: bool,
}

impl Pipe {
    pub fn new(name: impl Into<String>, from: TankId, to: TankId, route: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            route,
            is_flowing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from(&self) -> TankId {
        self.from
    }

    pub fn to(&self) -> TankId {
        self.to
    }

    /// Waypoints from the source outlet to the destination inlet.
    pub fn route(&self) -> &[Point] {
        &self.route
    }

    /// Polyline length of the route.
    pub fn length(&self) -> Real {
        route_length(&self.route)
    }

    pub fn is_flowing(&self) -> bool {
        self.is_flowing
    }

    pub fn set_flow_state(&mut self, flowing: bool) {
        self.is_flowing = flowing;
    }

    pub fn snapshot(&self, id: PipeId) -> PipeSnapshot {
        PipeSnapshot {
            id,
            name: self.name.clone(),
            from: self.from,
            to: self.to,
            is_flowing: self.is_flowing,
            length: self.length(),
            route: self.route.clone(),
        }
    }
}

/// Point-in-time copy of a pipe's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSnapshot {
    pub id: PipeId,
    pub name: String,
    pub from: TankId,
    pub to: TankId,
    pub is_flowing: bool,
    pub length: Real,
    pub route: Vec<Point>,
}
