//! Named scalar variables attached to each cell.
//!
//! The name→index table is shared between all cells of a definition.
//! Behaviors resolve the indices they need once at set-up time with
//! [`CustomData::index`] and then read and write by index in the hot loop.

use std::sync::Arc;

use crate::{AgentError, AgentResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomData {
    names:  Arc<Vec<String>>,
    values: Vec<f64>,
}

impl CustomData {
    /// Define a variable and return its index.  Redefining a name overwrites
    /// its default value and returns the existing index.
    pub fn add_variable(&mut self, name: impl Into<String>, value: f64) -> usize {
        let name = name.into();
        if let Some(i) = self.index(&name) {
            self.values[i] = value;
            return i;
        }
        Arc::make_mut(&mut self.names).push(name);
        self.values.push(value);
        self.values.len() - 1
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Like [`index`](Self::index), failing with a typed error.
    pub fn require(&self, name: &str) -> AgentResult<usize> {
        self.index(name).ok_or_else(|| AgentError::UnknownCustomVariable(name.to_owned()))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        match self.values.get_mut(index) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.index(name).and_then(|i| self.get(i))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
