//! Bounded liquid reservoir.
//!
//! A tank holds a quantity in `[0, capacity]`. Every mutating operation
//! saturates against those bounds itself; nothing corrects the quantity
//! after the fact. The fill level is always derived from the quantity on
//! read, so the two cannot drift apart.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use tc_core::{Point, Real, TankGeometry, TankId, non_negative_or_zero};

/// Quantity at or below which a tank counts as empty.
pub const EMPTY_TOLERANCE: Real = 0.1;

/// Distance below capacity at or above which a tank counts as full.
pub const FULL_TOLERANCE: Real = 0.1;

/// A capacity-bounded tank with an optional target-level setpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    name: String,
    capacity: Real,
    quantity: Real,
    target_level_percent: Option<Real>,
    geometry: TankGeometry,
}

impl Tank {
    /// Create an empty tank.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidCapacity`] if `capacity` is not finite and positive.
    pub fn new(
        name: impl Into<String>,
        capacity: Real,
        geometry: TankGeometry,
    ) -> SimResult<Self> {
        let name = name.into();
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(SimError::InvalidCapacity { name, capacity });
        }
        Ok(Self {
            name,
            capacity,
            quantity: 0.0,
            target_level_percent: None,
            geometry,
        })
    }

    /// Set the initial quantity.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidQuantity`] unless `0 <= quantity <= capacity`.
    pub fn with_quantity(mut self, quantity: Real) -> SimResult<Self> {
        if !(quantity.is_finite() && (0.0..=self.capacity).contains(&quantity)) {
            return Err(SimError::InvalidQuantity {
                name: self.name,
                quantity,
                capacity: self.capacity,
            });
        }
        self.quantity = quantity;
        Ok(self)
    }

    /// Set the initial target level.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TargetOutOfRange`] unless `percent` is `None` or
    /// a finite value in `[0, 100]`.
    pub fn with_target(mut self, percent: Option<Real>) -> SimResult<Self> {
        self.set_target(percent)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> Real {
        self.capacity
    }

    pub fn quantity(&self) -> Real {
        self.quantity
    }

    /// Fill fraction `quantity / capacity`, in `[0, 1]`.
    pub fn level(&self) -> Real {
        self.quantity / self.capacity
    }

    pub fn target_level_percent(&self) -> Option<Real> {
        self.target_level_percent
    }

    pub fn geometry(&self) -> &TankGeometry {
        &self.geometry
    }

    /// Remaining room before the tank is physically full.
    pub fn free_space(&self) -> Real {
        self.capacity - self.quantity
    }

    /// Quantity at which the setpoint closes the inlet, if a setpoint is set.
    pub fn target_quantity(&self) -> Option<Real> {
        self.target_level_percent
            .map(|pct| self.capacity * pct / 100.0)
    }

    /// Add up to `amount`, returning what was accepted.
    ///
    /// Anything beyond the free space is discarded.
    pub fn deposit(&mut self, amount: Real) -> Real {
        debug_assert!(!(amount < 0.0), "deposit amount must be >= 0, got {amount}");
        let accepted = non_negative_or_zero(amount).min(self.free_space());
        self.quantity = (self.quantity + accepted).min(self.capacity);
        accepted
    }

    /// Remove up to `amount`, returning what was removed.
    ///
    /// An emptier-than-requested tank under-delivers.
    pub fn withdraw(&mut self, amount: Real) -> Real {
        debug_assert!(!(amount < 0.0), "withdraw amount must be >= 0, got {amount}");
        let removed = non_negative_or_zero(amount).min(self.quantity);
        self.quantity = (self.quantity - removed).max(0.0);
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.quantity <= EMPTY_TOLERANCE
    }

    pub fn is_full(&self) -> bool {
        self.quantity >= self.capacity - FULL_TOLERANCE
    }

    /// Store or clear the target level.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TargetOutOfRange`] unless the percent lies in `[0, 100]`.
    pub fn set_target(&mut self, percent: Option<Real>) -> SimResult<()> {
        if let Some(pct) = percent
            && !(pct.is_finite() && (0.0..=100.0).contains(&pct))
        {
            return Err(SimError::TargetOutOfRange { percent: pct });
        }
        self.target_level_percent = percent;
        Ok(())
    }

    /// Manual fill straight to capacity.
    pub fn force_fill(&mut self) {
        self.quantity = self.capacity;
    }

    /// Manual drain straight to zero.
    pub fn force_drain(&mut self) {
        self.quantity = 0.0;
    }

    pub fn outlet_point(&self) -> Point {
        self.geometry.outlet_point()
    }

    pub fn inlet_point(&self) -> Point {
        self.geometry.inlet_point()
    }

    /// Screen `y` of the liquid surface inside the tank rectangle.
    pub fn surface_y(&self) -> Real {
        self.geometry.level_y(self.level())
    }

    /// Read-only view for presentation layers.
    pub fn snapshot(&self, id: TankId) -> TankSnapshot {
        TankSnapshot {
            id,
            name: self.name.clone(),
            capacity: self.capacity,
            quantity: self.quantity,
            level: self.level(),
            surface_y: self.surface_y(),
            target_level_percent: self.target_level_percent,
            geometry: self.geometry,
        }
    }
}

/// Point-in-time copy of a tank's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: TankId,
    pub name: String,
    pub capacity: Real,
    pub quantity: Real,
    pub level: Real,
    pub surface_y: Real,
    pub target_level_percent: Option<Real>,
    pub geometry: TankGeometry,
}
