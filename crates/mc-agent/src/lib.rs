//! `mc-agent` — the cell record and everything a cell carries.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                         |
//! |-----------------|------------------------------------------------------------------|
//! | [`cell`]        | `Cell`: position, velocity, phenotype, attachments, flags         |
//! | [`phenotype`]   | `Phenotype` and its sub-records (cycle, death, volume, ...)       |
//! | [`models`]      | Standard cycle and death models, model/phase codes                |
//! | [`definition`]  | `CellDefinition`, `CellDefinitions` (type templates by id/name)   |
//! | [`store`]       | `CellStore`: generational arena + insertion-ordered population    |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                             |
//! |---------|--------------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the plain phenotype records.  |

pub mod cell;
pub mod definition;
pub mod error;
pub mod models;
pub mod phenotype;
pub mod store;


pub use cell::Cell;
pub use definition::{CellDefinition, CellDefinitions};
pub use error::{AgentError, AgentResult};
pub use models::StandardModels;
pub use phenotype::{
    ArrestCallback, ArrestCondition, CustomData, CycleModel, CycleState, Death, DeathModel,
    DeathParameters, Geometry, MechanicsParams, Motility, Phase, PhaseCallback, PhaseHook,
    PhaseLink, Phenotype, Secretion, Volume,
};
pub use store::{CellStore, Slot};
