//! # Identity Registry
//!
//! Registered riders or drivers, keyed by identifier. One `Registry` per
//! namespace, so a rider and a driver may share an id.
//!
//! Entries keep registration order; listings come back in that order.

use std::collections::HashMap;

use ride_core::{CoreError, CoreResult, Identity};

/// Insertion-ordered store of one kind of identity.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Identity> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new identity.
    ///
    /// Fails with `DuplicateIdentifier` if the id is taken in this
    /// namespace; the registry is left untouched.
    pub fn register(&mut self, entity: T) -> CoreResult<&T> {
        if self.contains(entity.id()) {
            return Err(CoreError::DuplicateIdentifier {
                kind: T::KIND,
                id: entity.id().to_string(),
            });
        }

        let slot = self.entries.len();
        self.index.insert(entity.id().to_string(), slot);
        self.entries.push(entity);
        Ok(&self.entries[slot])
    }

    /// Looks up an identity, or `NotFound`.
    pub fn get(&self, id: &str) -> CoreResult<&T> {
        self.index
            .get(id)
            .map(|&slot| &self.entries[slot])
            .ok_or_else(|| CoreError::not_found(T::KIND, id))
    }

    pub fn get_mut(&mut self, id: &str) -> CoreResult<&mut T> {
        match self.index.get(id) {
            Some(&slot) => Ok(&mut self.entries[slot]),
            None => Err(CoreError::not_found(T::KIND, id)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
