//! Client account use-cases.
//!
//! All listing funnels through the caller's [`AccessScope`]; admin mutations
//! enforce the linked-user uniqueness invariant before touching the store.

use std::sync::Arc;

use serde_json::json;

use super::access::{AccessScope, Actor};
use super::audit::EntityKind;
use super::audit_service::AuditRecorder;
use super::client::{ClientAccount, ClientAccountPatch, NewClientAccount};
use super::error::DomainError;
use super::identity::{IdentityId, RecordId};
use super::ports::{ClientRepository, ClientRepositoryError, visible_to};
use super::role::Capability;

/// Active clients returned to a professional's dashboard at most.
const ASSIGNED_LIST_LIMIT: usize = 100;

/// Client account service implementing the admin and portal use-cases.
pub struct ClientService<R> {
    clients: Arc<R>,
    audit: AuditRecorder,
}

impl<R> Clone for ClientService<R> {
    fn clone(&self) -> Self {
        Self {
            clients: Arc::clone(&self.clients),
            audit: self.audit.clone(),
        }
    }
}

impl<R> ClientService<R> {
    /// Create a service over the given repository and audit recorder.
    #[must_use]
    pub fn new(clients: Arc<R>, audit: AuditRecorder) -> Self {
        Self { clients, audit }
    }
}

fn map_client_error(error: ClientRepositoryError) -> DomainError {
    match error {
        ClientRepositoryError::Connection { message } => {
            DomainError::unavailable(format!("client repository unavailable: {message}"))
        }
        ClientRepositoryError::Query { message } => {
            DomainError::internal(format!("client repository error: {message}"))
        }
        ClientRepositoryError::Missing { id } => {
            DomainError::not_found(format!("client {id} does not exist"))
        }
    }
}

impl<R> ClientService<R>
where
    R: ClientRepository,
{
    /// List the accounts visible to the caller.
    ///
    /// Admins get the full collection newest first; professionals their
    /// active assignments (store order); clients the account linked to their
    /// login.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<ClientAccount>, DomainError> {
        match actor.scope() {
            AccessScope::Unrestricted => self
                .clients
                .list_all_ordered()
                .await
                .map_err(map_client_error),
            AccessScope::AssignedProfessional(id) => self
                .clients
                .list_assigned_to(&id, ASSIGNED_LIST_LIMIT)
                .await
                .map_err(map_client_error),
            AccessScope::LinkedUser(id) => self
                .clients
                .find_active_by_linked_user(&id)
                .await
                .map_err(map_client_error),
        }
    }

    /// Fetch one account the caller is allowed to see.
    ///
    /// A record outside the caller's scope answers not-found, matching what
    /// the store's own rules would return.
    pub async fn get(&self, actor: &Actor, id: &RecordId) -> Result<ClientAccount, DomainError> {
        let account = self
            .clients
            .find_by_id(id)
            .await
            .map_err(map_client_error)?
            .ok_or_else(|| DomainError::not_found(format!("client {id} does not exist")))?;
        if !visible_to(&account, &actor.scope()) {
            return Err(DomainError::not_found(format!("client {id} does not exist")));
        }
        Ok(account)
    }

    /// The active account linked to the calling portal user, if any.
    pub async fn own_account(&self, actor: &Actor) -> Result<Option<ClientAccount>, DomainError> {
        let AccessScope::LinkedUser(id) = actor.scope() else {
            return Err(DomainError::forbidden(
                "only portal users have a linked account",
            ));
        };
        let mut matches = self
            .clients
            .find_active_by_linked_user(&id)
            .await
            .map_err(map_client_error)?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    /// Open a new account.
    ///
    /// Rejects with a conflict when the linked portal user is already taken
    /// by another active account; performs no write in that case.
    pub async fn create(
        &self,
        actor: &Actor,
        account: NewClientAccount,
    ) -> Result<ClientAccount, DomainError> {
        self.require(actor, Capability::ManageClients)?;
        if let Some(linked) = &account.linked_user_id {
            self.ensure_link_free(linked, None).await?;
        }

        let id = RecordId::generate();
        let created = self
            .clients
            .insert(&id, &account)
            .await
            .map_err(map_client_error)?;

        self.audit
            .record(
                "client_created",
                EntityKind::Clients,
                created.id.as_str(),
                actor,
                json!({ "name": created.name }),
            )
            .await;
        Ok(created)
    }

    /// Merge a partial update into an account.
    ///
    /// Re-runs the uniqueness check when the patch links a portal user,
    /// excluding the record under update. Last writer wins; repeating the
    /// same patch is not an error.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &RecordId,
        patch: ClientAccountPatch,
    ) -> Result<ClientAccount, DomainError> {
        self.require(actor, Capability::ManageClients)?;
        if let Some(Some(linked)) = &patch.linked_user_id {
            self.ensure_link_free(linked, Some(id)).await?;
        }

        let updated = self
            .clients
            .merge(id, &patch)
            .await
            .map_err(map_client_error)?;

        self.audit
            .record(
                "client_updated",
                EntityKind::Clients,
                updated.id.as_str(),
                actor,
                serde_json::to_value(&PatchSummary::from(&patch)).unwrap_or_default(),
            )
            .await;
        Ok(updated)
    }

    /// Replace the assignment set wholesale.
    pub async fn assign_professionals(
        &self,
        actor: &Actor,
        id: &RecordId,
        professional_ids: Vec<IdentityId>,
    ) -> Result<ClientAccount, DomainError> {
        self.require(actor, Capability::AssignProfessionals)?;
        let updated = self
            .clients
            .replace_assignments(id, &professional_ids)
            .await
            .map_err(map_client_error)?;

        self.audit
            .record(
                "professional_assigned",
                EntityKind::Clients,
                updated.id.as_str(),
                actor,
                json!({
                    "professionalIds": professional_ids
                        .iter()
                        .map(IdentityId::as_str)
                        .collect::<Vec<_>>(),
                }),
            )
            .await;
        Ok(updated)
    }

    /// Remove an account.
    ///
    /// Child documents and todos are deliberately left in place.
    pub async fn delete(&self, actor: &Actor, id: &RecordId) -> Result<(), DomainError> {
        self.require(actor, Capability::ManageClients)?;
        self.clients.delete(id).await.map_err(map_client_error)?;

        self.audit
            .record(
                "client_deleted",
                EntityKind::Clients,
                id.as_str(),
                actor,
                json!({}),
            )
            .await;
        Ok(())
    }

    fn require(&self, actor: &Actor, capability: Capability) -> Result<(), DomainError> {
        if actor.role.allows(capability) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "role {} may not manage client accounts",
                actor.role
            )))
        }
    }

    async fn ensure_link_free(
        &self,
        linked: &IdentityId,
        excluding: Option<&RecordId>,
    ) -> Result<(), DomainError> {
        let holders = self
            .clients
            .find_active_by_linked_user(linked)
            .await
            .map_err(map_client_error)?;
        let taken = holders
            .iter()
            .any(|holder| excluding != Some(&holder.id));
        if taken {
            return Err(DomainError::conflict(
                "this portal user is already linked to another client",
            ));
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PatchSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    link_changed: bool,
}

impl From<&ClientAccountPatch> for PatchSummary {
    fn from(patch: &ClientAccountPatch) -> Self {
        Self {
            name: patch.name.clone(),
            active: patch.active,
            link_changed: patch.linked_user_id.is_some(),
        }
    }
}
