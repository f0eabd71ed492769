//! Cascade configuration schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub cascade: CascadeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CascadeDef {
    #[serde(default = "default_transfer_rate")]
    pub transfer_rate: f64,
    /// Host time between ticks.
    #[serde(default = "default_tick_period")]
    pub tick_period: f64,
    #[serde(default)]
    pub tanks: Vec<TankDef>,
    /// Evaluation order is list order.
    #[serde(default)]
    pub stages: Vec<StageDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default)]
    pub initial_quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level_percent: Option<f64>,
    #[serde(default)]
    pub geometry: GeometryDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct GeometryDef {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub from_tank_id: String,
    pub to_tank_id: String,
    /// Omitted: 0.1 for the first stage, 5.0 for the rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_threshold: Option<f64>,
    /// Interior route points between the source outlet and destination inlet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<[f64; 2]>>,
}

impl StageDef {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

fn default_transfer_rate() -> f64 {
    tc_sim::DEFAULT_TRANSFER_RATE
}

fn default_tick_period() -> f64 {
    tc_sim::DEFAULT_TICK_PERIOD
}

fn default_capacity() -> f64 {
    100.0
}
