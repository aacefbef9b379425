//! Owning collection of `Properties` indexed by id.
//!
//! This is the minimum a caller needs to obtain a property container:
//! create one under a fresh id, look it up again, and drop it.

use std::collections::BTreeMap;

use crate::error::{PropertiesError, PropertiesResult};
use crate::properties::Properties;
use crate::types::LookupConfig;
use crate::{log_debug, log_warn};

/// Named collection owning property containers.
#[derive(Debug, Clone, Default)]
pub struct ModelPart {
    name: String,
    properties: BTreeMap<u32, Properties>,
    config: LookupConfig,
}

impl ModelPart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Containers created by this model part inherit `config`.
    pub fn with_config(name: impl Into<String>, config: LookupConfig) -> Self {
        Self {
            name: name.into(),
            config,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create an empty container under `id` and return it for filling in.
    ///
    /// # Errors
    /// `DuplicateId` if a container with `id` already exists.
    pub fn create_new_properties(&mut self, id: u32) -> PropertiesResult<&mut Properties> {
        if self.properties.contains_key(&id) {
            log_warn!("ModelPart '{}': properties {} already exist", self.name, id);
            return Err(PropertiesError::duplicate_id(id));
        }
        log_debug!("ModelPart '{}': created properties {}", self.name, id);
        let config = self.config;
        Ok(self
            .properties
            .entry(id)
            .or_insert_with(|| Properties::with_config(id, config)))
    }

    /// Take ownership of an existing container under its own id.
    ///
    /// # Errors
    /// `DuplicateId` if that id is already used.
    pub fn add_properties(&mut self, properties: Properties) -> PropertiesResult<()> {
        let id = properties.id();
        if self.properties.contains_key(&id) {
            return Err(PropertiesError::duplicate_id(id));
        }
        self.properties.insert(id, properties);
        Ok(())
    }

    pub fn get_properties(&self, id: u32) -> PropertiesResult<&Properties> {
        self.properties
            .get(&id)
            .ok_or(PropertiesError::properties_not_found(id))
    }

    pub fn get_properties_mut(&mut self, id: u32) -> PropertiesResult<&mut Properties> {
        self.properties
            .get_mut(&id)
            .ok_or(PropertiesError::properties_not_found(id))
    }

    pub fn has_properties(&self, id: u32) -> bool {
        self.properties.contains_key(&id)
    }

    /// Remove and return the container with `id`, if any.
    pub fn remove_properties(&mut self, id: u32) -> Option<Properties> {
        self.properties.remove(&id)
    }

    pub fn number_of_properties(&self) -> usize {
        self.properties.len()
    }

    /// Containers in ascending id order.
    pub fn properties(&self) -> impl Iterator<Item = &Properties> + '_ {
        self.properties.values()
    }
}
