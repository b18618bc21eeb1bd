//! `mc-core` — foundational types for the multicellular simulator.
//!
//! This crate is a dependency of every other `mc-*` crate and has no `mc-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`ids`]          | `CellId`, `CellTypeId`, `VoxelIndex`, `SubstrateId`, `CellKey` |
//! | [`geometry`]     | `Vec3`, sphere helpers, `random_unit_vector`               |
//! | [`time`]         | `SimClock`, `TimeSteps`                                    |
//! | [`config`]       | `SimConfig`, `DomainConfig`, `Integrator`                  |
//! | [`rng`]          | `CellRng` (counter-addressed), `RngPurpose`                |
//! | [`environment`]  | `Microenvironment` trait, `SourceSink`, uniform stand-in   |
//! | [`error`]        | `McError`, `McResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on value types; JSON config loading. |

pub mod config;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DomainConfig, Integrator, SimConfig};
pub use environment::{Microenvironment, NoMicroenvironment, SourceSink, UniformMicroenvironment};
pub use error::{McError, McResult};
pub use geometry::{Vec3, random_unit_vector, sphere_radius, sphere_volume, vec3};
pub use ids::{CellId, CellKey, CellTypeId, SubstrateId, VoxelIndex};
pub use rng::{CellRng, RngPurpose};
pub use time::{SimClock, TimeSteps};
