//! # spaceos-core
//!
//! **Telemetry for a space vehicle that does not exist.**
//!
//! `spaceos-core` fabricates the readings behind the Space Vehicle OS
//! dashboard: rolling memory and network windows, subsystem health, packet
//! loss counters and a handful of scalar vehicle values. Nothing here touches
//! hardware or the network; every value comes from a bounded random walk.
//!
//! ## Quick Start
//!
//! ```
//! use spaceos_core::{RngNoise, VehicleTelemetry, advance};
//!
//! let mut telemetry = VehicleTelemetry::default();
//! let mut noise = RngNoise::seeded(7);
//!
//! let report = advance(&mut telemetry, &mut noise);
//! assert_eq!(report.tick, 0);
//! assert_eq!(telemetry.memory.len(), 8);
//! ```
//!
//! ## Architecture
//!
//! State → [`advance`] (one tick) → renderer (in `spaceos-cli`)
//!
//! All randomness flows through the [`NoiseSource`] trait, so a run can be
//! replayed from a seed ([`RngNoise::seeded`]) or scripted draw by draw
//! ([`ScriptedNoise`]).

pub mod noise;
pub mod series;
pub mod state;
pub mod update;

pub use noise::{NoiseSource, RngNoise, ScriptedNoise};
pub use series::{MetricSeries, SeriesBounds};
pub use state::{
    PacketChannel, PacketTable, Subsystem, SubsystemRegistry, VehicleState, VehicleTelemetry,
};
pub use update::{TickReport, advance};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
