//! Name resolution backed by a fixed table.

use std::collections::HashMap;

use alloy_primitives::Address;
use async_trait::async_trait;

use super::NameResolver;
use crate::errors::ServiceResult;

/// Resolves names from an in-memory table. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    names: HashMap<String, Address>,
}

impl StaticNameResolver {
    pub fn new(names: impl IntoIterator<Item = (String, Address)>) -> Self {
        Self {
            names: names
                .into_iter()
                .map(|(name, address)| (name.to_lowercase(), address))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: &str, address: Address) {
        self.names.insert(name.to_lowercase(), address);
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve(&self, name: &str) -> ServiceResult<Option<Address>> {
        Ok(self.names.get(&name.to_lowercase()).copied())
    }
}
