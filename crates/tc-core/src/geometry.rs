//! Plane geometry shared between the simulation and whatever draws it.
//!
//! Screen convention: `y` grows downwards, so a tank's outlet sits on its
//! bottom edge and its inlet on its top edge.

use crate::numeric::{Real, ensure_finite, ensure_non_negative};
use crate::{TcError, TcResult};

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
}

impl From<[Real; 2]> for Point {
    fn from([x, y]: [Real; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle occupied by a tank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TankGeometry {
    pub x: Real,
    pub y: Real,
    pub width: Real,
    pub height: Real,
}

impl TankGeometry {
    /// Create a rectangle, rejecting non-finite coordinates and negative sizes.
    pub fn new(x: Real, y: Real, width: Real, height: Real) -> TcResult<Self> {
        Ok(Self {
            x: ensure_finite(x, "tank x")?,
            y: ensure_finite(y, "tank y")?,
            width: ensure_non_negative(width, "tank width")?,
            height: ensure_non_negative(height, "tank height")?,
        })
    }

    /// Anchor where an outgoing pipe leaves the tank (bottom centre).
    pub fn outlet_point(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Anchor where an incoming pipe enters the tank (top centre).
    pub fn inlet_point(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    /// Vertical position of a fill fraction in `[0, 1]`, measured from the bottom edge.
    pub fn level_y(&self, fraction: Real) -> Real {
        self.y + self.height - self.height * fraction.clamp(0.0, 1.0)
    }
}

/// Orthogonal elbow: down from `from` by `drop`, across to `to.x`, then straight to `to`.
pub fn elbow_route(from: Point, to: Point, drop: Real) -> Vec<Point> {
    let knee_y = from.y + drop;
    vec![
        from,
        Point::new(from.x, knee_y),
        Point::new(to.x, knee_y),
        to,
    ]
}

/// Route through explicit interior waypoints between two anchors.
pub fn waypoint_route(from: Point, interior: &[Point], to: Point) -> TcResult<Vec<Point>> {
    let mut route = Vec::with_capacity(interior.len() + 2);
    route.push(from);
    for p in interior {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(TcError::InvalidArg {
                what: "route waypoint must be finite",
            });
        }
        route.push(*p);
    }
    route.push(to);
    Ok(route)
}

/// Total polyline length of a route.
pub fn route_length(route: &[Point]) -> Real {
    route
        .windows(2)
        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
        .sum()
}
