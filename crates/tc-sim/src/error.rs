//! Error types for cascade configuration.
//!
//! A running cascade never fails: empty sources, full destinations and
//! reached setpoints all resolve to "no transfer this tick". Every variant
//! here is raised while assembling or reconfiguring a cascade.

use tc_core::TankId;
use thiserror::Error;

/// Errors raised while configuring a cascade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid capacity for tank '{name}': {capacity} (must be finite and > 0)")]
    InvalidCapacity { name: String, capacity: f64 },

    #[error("Invalid transfer rate: {rate} (must be finite and > 0)")]
    InvalidTransferRate { rate: f64 },

    #[error("Target level out of range: {percent}% (must be within [0, 100])")]
    TargetOutOfRange { percent: f64 },

    #[error("Invalid quantity for tank '{name}': {quantity} (capacity {capacity})")]
    InvalidQuantity {
        name: String,
        quantity: f64,
        capacity: f64,
    },

    #[error("Invalid source threshold: {threshold} (must be finite and >= 0)")]
    InvalidThreshold { threshold: f64 },

    #[error("Invalid stage: {what}")]
    InvalidStage { what: String },

    #[error("Cascade has no stages")]
    EmptyCascade,

    #[error("Unknown tank: {id}")]
    UnknownTank { id: TankId },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Core error: {0}")]
    Core(#[from] tc_core::TcError),
}

pub type SimResult<T> = Result<T, SimError>;
