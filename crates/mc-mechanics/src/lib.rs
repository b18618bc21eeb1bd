//! `mc-mechanics` — cell–cell forces, motility and position updates.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`potentials`] | Pairwise repulsion/adhesion, basement membrane, attachments    |
//! | [`motility`]   | Persistent biased random walk                                  |
//! | [`engine`]     | `MechanicsEngine`: velocity pass, integration, re-bucketing    |
//! | [`error`]      | `MechanicsError`, `MechanicsResult<T>`                         |
//!
//! # Overdamped model
//!
//! Cells have no inertia: each mechanics step sums velocity contributions
//! and moves the cell by `dt * v`.
//!
//! 1. **Velocity pass** (parallel with the `parallel` feature): for every
//!    in-play movable cell, sum pair terms over its own and the 26
//!    neighbouring voxels, membrane and attachment terms, and motility.
//!    Reads positions only; results go into a buffer.
//! 2. **Integration pass**: write the buffered velocities, advance
//!    positions, move cells between buckets under per-voxel locks.
//! 3. **Out-of-domain pass** (sequential): cells whose new position left the
//!    domain are flagged and taken out of the grid.
//!
//! Because no position changes until every velocity is known, every cell
//! sees its neighbours as they were at the start of the step.
//!
//! # Feature flags
//!
//! | Feature    | Effect                                    |
//! |------------|-------------------------------------------|
//! | `parallel` | Run passes 1 and 2 on the rayon pool      |

pub mod engine;
pub mod error;
pub mod motility;
pub mod potentials;

#[cfg(test)]
mod tests;

pub use engine::{MechanicsEngine, MechanicsReport, VelocityUpdate};
pub use error::{MechanicsError, MechanicsResult};
