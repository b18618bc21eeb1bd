//! `mc-behavior` — user behavior hooks and the actions they request.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`action`]   | `CellAction` enum (`Divide`, `Die`, `Attach`, …)                |
//! | [`context`]  | `PhenotypeContext<'a>`, `CellView<'a>`: read-only tick state    |
//! | [`model`]    | `CellBehavior` trait                                            |
//! | [`noop`]     | `NoopBehavior`: never changes anything                          |
//! | [`registry`] | `BehaviorRegistry`: one behavior per cell type, with a default  |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! The phenotype pass in mc-sim is split in two:
//!
//! 1. **Update phase** (parallel): for every live cell call
//!    `CellBehavior::update_phenotype`, then advance the cycle, death and
//!    volume.  A behavior may edit the cell's own phenotype but sees the
//!    rest of the world only through `&PhenotypeContext`.
//!
//! 2. **Apply phase** (sequential): the collected `Vec<CellAction>`s are
//!    applied to the population in ascending `CellId` order together with
//!    cycle-driven divisions and removals.
//!
//! Behaviors therefore only need to be `Send + Sync`; membership never
//! changes while the parallel phase runs.

pub mod action;
pub mod context;
pub mod error;
pub mod model;
pub mod noop;
pub mod registry;


pub use action::CellAction;
pub use context::{CellView, PhenotypeContext};
pub use error::{BehaviorError, BehaviorResult};
pub use model::CellBehavior;
pub use noop::NoopBehavior;
pub use registry::BehaviorRegistry;
