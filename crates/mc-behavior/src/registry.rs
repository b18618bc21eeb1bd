//! Behavior lookup by cell type.

use std::sync::Arc;

use mc_agent::CellDefinitions;
use mc_core::CellTypeId;

use crate::{BehaviorError, BehaviorResult, CellBehavior, NoopBehavior};

/// One [`CellBehavior`] per cell type, resolved once at setup.
///
/// Types without a registered behavior fall back to the default, which is
/// [`NoopBehavior`] unless replaced.
#[derive(Clone)]
pub struct BehaviorRegistry {
    default: Arc<dyn CellBehavior>,
    by_type: Vec<Option<Arc<dyn CellBehavior>>>,
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self { default: Arc::new(NoopBehavior), by_type: Vec::new() }
    }
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(behavior: impl CellBehavior) -> Self {
        Self { default: Arc::new(behavior), by_type: Vec::new() }
    }

    pub fn set_default(&mut self, behavior: impl CellBehavior) {
        self.default = Arc::new(behavior);
    }

    pub fn register(&mut self, type_id: CellTypeId, behavior: impl CellBehavior) {
        self.register_shared(type_id, Arc::new(behavior));
    }

    /// Register one behavior instance for several types.
    pub fn register_shared(&mut self, type_id: CellTypeId, behavior: Arc<dyn CellBehavior>) {
        let i = type_id.index();
        if self.by_type.len() <= i {
            self.by_type.resize(i + 1, None);
        }
        self.by_type[i] = Some(behavior);
    }

    /// Register by cell-definition name.
    pub fn register_by_name(
        &mut self,
        definitions: &CellDefinitions,
        name:        &str,
        behavior:    impl CellBehavior,
    ) -> BehaviorResult<CellTypeId> {
        let def = definitions
            .by_name(name)
            .ok_or_else(|| BehaviorError::UnknownCellType(name.to_owned()))?;
        let type_id = def.type_id;
        self.register(type_id, behavior);
        Ok(type_id)
    }

    #[inline]
    pub fn get(&self, type_id: CellTypeId) -> &dyn CellBehavior {
        match self.by_type.get(type_id.index()) {
            Some(Some(b)) => b.as_ref(),
            _ => self.default.as_ref(),
        }
    }

    /// `true` if `type_id` has its own behavior rather than the default.
    pub fn has_specific(&self, type_id: CellTypeId) -> bool {
        matches!(self.by_type.get(type_id.index()), Some(Some(_)))
    }
}
