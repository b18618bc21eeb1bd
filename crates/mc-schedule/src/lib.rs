//! `mc-schedule` — periodic timers and initial placement loading.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`timer`]  | `PeriodicTimer`: half-step countdown                       |
//! | [`timers`] | `TimerKind`, `TimerSet`: every subsystem's timer           |
//! | [`loader`] | `InitialCell`, `load_placements_csv`, `load_placements_reader` |
//! | [`error`]  | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Timer model (summary)
//!
//! The clock advances only by the diffusion step `dt`.  Each subsystem has a
//! countdown that loses `dt` per tick:
//!
//! ```text
//! due        = countdown < dt / 2
//! on fire:     countdown += period        (not reset to period)
//! every tick:  countdown -= dt
//! ```
//!
//! Adding the period instead of resetting keeps the k-th firing within
//! `dt / 2` of `k * period` however long the run is.

pub mod error;
pub mod loader;
pub mod timer;
pub mod timers;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{InitialCell, load_placements_csv, load_placements_reader};
pub use timer::PeriodicTimer;
pub use timers::{TimerKind, TimerSet};
