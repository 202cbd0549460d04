//! In-memory identity provider

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::entities::token::TokenIdentity;
use crate::errors::DomainResult;

use super::r#trait::IdentityProvider;

#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    identities: RwLock<HashMap<i64, TokenIdentity>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identities(identities: impl IntoIterator<Item = TokenIdentity>) -> Self {
        let provider = Self::new();
        {
            let mut map = provider.identities.write();
            for identity in identities {
                map.insert(identity.user_id, identity);
            }
        }
        provider
    }

    pub fn remove(&self, user_id: i64) -> Option<TokenIdentity> {
        self.identities.write().remove(&user_id)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn find_identity(&self, user_id: i64) -> DomainResult<Option<TokenIdentity>> {
        Ok(self.identities.read().get(&user_id).cloned())
    }

    async fn store_identity(&self, identity: &TokenIdentity) -> DomainResult<()> {
        self.identities
            .write()
            .insert(identity.user_id, identity.clone());
        Ok(())
    }
}
