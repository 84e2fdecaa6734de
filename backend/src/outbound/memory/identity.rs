//! Identity-provider port implementation over the credential map.

use async_trait::async_trait;

use crate::domain::LoginCredentials;
use crate::domain::ports::{AuthenticatedIdentity, IdentityProvider, IdentityProviderError};

use super::{MemoryPlatform, read_guard};

#[async_trait]
impl IdentityProvider for MemoryPlatform {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError> {
        let registry = read_guard(&self.credentials);
        let Some(registered) = registry.get(credentials.email().as_str()) else {
            return Err(IdentityProviderError::InvalidCredentials);
        };
        if registered.password != credentials.password() {
            return Err(IdentityProviderError::InvalidCredentials);
        }
        Ok(AuthenticatedIdentity {
            id: registered.identity.clone(),
            email: credentials.email().clone(),
        })
    }
}
