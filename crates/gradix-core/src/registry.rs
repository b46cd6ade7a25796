//! Validator registry: stable string ids mapped to validator factories.
//!
//! The registry is built per grading run by the caller; there is no
//! process-wide table, so concurrent runs in one process cannot observe
//! each other's registrations. Every resolution produces a fresh
//! validator instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::mission::MissionConfig;
use crate::validator::Validator;

/// Factory producing one validator instance from the mission configuration.
pub type ValidatorFactory =
    Box<dyn Fn(Arc<MissionConfig>) -> Box<dyn Validator> + Send + Sync>;

/// Maps validator ids declared in mission configs to concrete factories.
#[derive(Default)]
pub struct ValidatorRegistry {
    factories: BTreeMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a stable id.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(Arc<MissionConfig>) -> Box<dyn Validator> + Send + Sync + 'static,
    {
        let id = id.into();
        if self.factories.contains_key(&id) {
            return Err(RegistryError::DuplicateValidator(id));
        }
        self.factories.insert(id, Box::new(factory));
        Ok(())
    }

    /// Construct a fresh validator for `id`.
    pub fn resolve(
        &self,
        id: &str,
        config: Arc<MissionConfig>,
    ) -> Result<Box<dyn Validator>, RegistryError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| RegistryError::UnknownValidator(id.to_string()))?;
        Ok(factory(config))
    }

    /// Registered ids, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
