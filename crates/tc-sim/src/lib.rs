//! Discrete-time simulation of a tank cascade.
//!
//! Provides:
//! - Capacity-bounded tanks with an optional target-level setpoint
//! - Pipes carrying a per-tick flow indicator for presentation
//! - A controller that evaluates source-to-destination stages in fixed order
//! - Manual fill/drain/setpoint operations applied between ticks
//! - A fixed-period session and a lock-guarded handle for hosts
//!
//! # Example
//!
//! ```
//! use tc_core::TankGeometry;
//! use tc_sim::{CascadeBuilder, Tank};
//!
//! let mut builder = CascadeBuilder::new();
//! let t1 = builder.add_tank(
//!     Tank::new("T1", 100.0, TankGeometry::default())
//!         .unwrap()
//!         .with_quantity(100.0)
//!         .unwrap(),
//! );
//! let t2 = builder.add_tank(Tank::new("T2", 100.0, TankGeometry::default()).unwrap());
//! builder.add_stage("P1", t1, t2).unwrap();
//! let mut cascade = builder.build().unwrap();
//!
//! let report = cascade.tick();
//! assert!(report.any_flowing());
//! assert!((cascade.total_volume() - 100.0).abs() < 1e-9);
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod pipe;
pub mod session;
pub mod shared;
pub mod stage;
pub mod tank;

// Re-exports for public API
pub use builder::{CascadeBuilder, DEFAULT_ROUTE_DROP, DEFAULT_TRANSFER_RATE, StageSpec};
pub use controller::{CascadeController, CascadeSnapshot, TickReport};
pub use error::{SimError, SimResult};
pub use pipe::{Pipe, PipeSnapshot};
pub use session::{DEFAULT_TICK_PERIOD, MAX_CATCH_UP_TICKS, Session, TickClock};
pub use shared::SharedCascade;
pub use stage::{DOWNSTREAM_BUFFER, Stage, StageOutcome, default_source_threshold};
pub use tank::{EMPTY_TOLERANCE, FULL_TOLERANCE, Tank, TankSnapshot};
