//! Cell type templates.
//!
//! A [`CellDefinition`] is the phenotype a new cell of that type starts
//! with.  Definitions are registered once at set-up time; names resolve to a
//! [`CellTypeId`] through [`CellDefinitions::type_id`].

use rustc_hash::FxHashMap;

use mc_core::{CellTypeId, McError};

use crate::{AgentError, AgentResult, Phenotype};

#[derive(Clone, Debug)]
pub struct CellDefinition {
    pub name:       String,
    pub type_id:    CellTypeId,
    pub phenotype:  Phenotype,
    pub is_movable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CellDefinitions {
    defs:    Vec<CellDefinition>,
    by_name: FxHashMap<String, CellTypeId>,
}

impl CellDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new type.  Type ids are assigned densely from 0.
    pub fn add(&mut self, name: impl Into<String>, phenotype: Phenotype) -> AgentResult<CellTypeId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(AgentError::DuplicateCellType(name));
        }
        let type_id = CellTypeId::try_from(self.defs.len())
            .map_err(|_| McError::Config("too many cell definitions".into()))?;
        self.by_name.insert(name.clone(), type_id);
        self.defs.push(CellDefinition { name, type_id, phenotype, is_movable: true });
        Ok(type_id)
    }

    pub fn get(&self, type_id: CellTypeId) -> Option<&CellDefinition> {
        self.defs.get(type_id.index())
    }

    pub fn get_mut(&mut self, type_id: CellTypeId) -> Option<&mut CellDefinition> {
        self.defs.get_mut(type_id.index())
    }

    /// Definition or [`McError::UnknownCellType`].
    pub fn require(&self, type_id: CellTypeId) -> AgentResult<&CellDefinition> {
        self.get(type_id).ok_or_else(|| McError::UnknownCellType(type_id).into())
    }

    pub fn type_id(&self, name: &str) -> AgentResult<CellTypeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| McError::UnknownCellTypeName(name.to_owned()).into())
    }

    pub fn by_name(&self, name: &str) -> Option<&CellDefinition> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellDefinition> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
