//! User profile and invite use-cases, including invite redemption.
//!
//! Admin operations are capability-gated; redemption runs on behalf of a
//! session that has no profile yet, so it takes the authenticated identity
//! instead of an [`Actor`].

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::access::Actor;
use super::audit::EntityKind;
use super::audit_service::AuditRecorder;
use super::error::DomainError;
use super::identity::{EmailAddress, IdentityId};
use super::invite::{Invite, NewInvite};
use super::ports::{
    AuthenticatedIdentity, InviteRepository, InviteRepositoryError, NewUserProfile,
    ProfileRepository, ProfileRepositoryError,
};
use super::profile::{UserProfile, UserProfilePatch};
use super::role::Capability;

/// User and invite service implementing the admin and setup use-cases.
pub struct UserService<P, I> {
    profiles: Arc<P>,
    invites: Arc<I>,
    audit: AuditRecorder,
}

impl<P, I> Clone for UserService<P, I> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            invites: Arc::clone(&self.invites),
            audit: self.audit.clone(),
        }
    }
}

impl<P, I> UserService<P, I> {
    /// Create a service over the given repositories and audit recorder.
    #[must_use]
    pub fn new(profiles: Arc<P>, invites: Arc<I>, audit: AuditRecorder) -> Self {
        Self {
            profiles,
            invites,
            audit,
        }
    }
}

fn map_profile_error(error: ProfileRepositoryError) -> DomainError {
    match error {
        ProfileRepositoryError::Connection { message } => {
            DomainError::unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            DomainError::internal(format!("profile repository error: {message}"))
        }
        ProfileRepositoryError::Missing { id } => {
            DomainError::not_found(format!("profile {id} does not exist"))
        }
    }
}

fn map_invite_error(error: InviteRepositoryError) -> DomainError {
    match error {
        InviteRepositoryError::Connection { message } => {
            DomainError::unavailable(format!("invite repository unavailable: {message}"))
        }
        InviteRepositoryError::Query { message } => {
            DomainError::internal(format!("invite repository error: {message}"))
        }
    }
}

impl<P, I> UserService<P, I>
where
    P: ProfileRepository,
    I: InviteRepository,
{
    /// All user profiles, admin only.
    pub async fn list_profiles(&self, actor: &Actor) -> Result<Vec<UserProfile>, DomainError> {
        self.require(actor, Capability::ManageUsers)?;
        self.profiles.list_all().await.map_err(map_profile_error)
    }

    /// Merge a partial update into a profile, admin only.
    pub async fn update_profile(
        &self,
        actor: &Actor,
        id: &IdentityId,
        patch: UserProfilePatch,
    ) -> Result<UserProfile, DomainError> {
        self.require(actor, Capability::ManageUsers)?;
        let updated = self
            .profiles
            .merge(id, &patch)
            .await
            .map_err(map_profile_error)?;

        self.audit
            .record(
                "user_updated",
                EntityKind::Users,
                updated.id.as_str(),
                actor,
                json!({ "active": updated.active }),
            )
            .await;
        Ok(updated)
    }

    /// Remove a profile, admin only.
    pub async fn delete_profile(&self, actor: &Actor, id: &IdentityId) -> Result<(), DomainError> {
        self.require(actor, Capability::ManageUsers)?;
        self.profiles.delete(id).await.map_err(map_profile_error)?;

        self.audit
            .record("user_deleted", EntityKind::Users, id.as_str(), actor, json!({}))
            .await;
        Ok(())
    }

    /// All pending invites, admin only.
    pub async fn list_invites(&self, actor: &Actor) -> Result<Vec<Invite>, DomainError> {
        self.require(actor, Capability::ManageInvites)?;
        self.invites.list_all().await.map_err(map_invite_error)
    }

    /// Issue an invite, admin only.
    ///
    /// Rejects with a conflict when a profile already exists for the
    /// address; performs no write in that case. The address arrives
    /// normalised by construction.
    pub async fn create_invite(
        &self,
        actor: &Actor,
        invite: NewInvite,
    ) -> Result<Invite, DomainError> {
        self.require(actor, Capability::ManageInvites)?;
        let existing = self
            .profiles
            .find_by_email(&invite.email)
            .await
            .map_err(map_profile_error)?;
        if existing.is_some() {
            return Err(DomainError::conflict(
                "a user with this email is already registered",
            ));
        }

        let created = self.invites.put(&invite).await.map_err(map_invite_error)?;

        self.audit
            .record(
                "invite_created",
                EntityKind::Invites,
                created.email.as_str(),
                actor,
                json!({ "role": created.role }),
            )
            .await;
        Ok(created)
    }

    /// Revoke an invite, admin only.
    pub async fn delete_invite(
        &self,
        actor: &Actor,
        email: &EmailAddress,
    ) -> Result<(), DomainError> {
        self.require(actor, Capability::ManageInvites)?;
        self.invites.delete(email).await.map_err(map_invite_error)?;

        self.audit
            .record(
                "invite_deleted",
                EntityKind::Invites,
                email.as_str(),
                actor,
                json!({}),
            )
            .await;
        Ok(())
    }

    /// Redeem the invite for an authenticated identity without a profile.
    ///
    /// Fast-path returns the existing profile when one already exists (a
    /// half-finished earlier redemption, or a stale gate answer). Otherwise
    /// the invite is looked up by the identity's normalised email, the
    /// profile is created from it, and the invite is deleted best-effort:
    /// a leftover invite is harmless because profile existence is checked
    /// first on every path.
    pub async fn redeem_invite(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<UserProfile, DomainError> {
        if let Some(existing) = self
            .profiles
            .find_by_id(&identity.id)
            .await
            .map_err(map_profile_error)?
        {
            return Ok(existing);
        }

        let invite = self
            .invites
            .find_by_email(&identity.email)
            .await
            .map_err(map_invite_error)?
            .ok_or_else(|| {
                DomainError::not_found("no invite found for this email; ask an administrator")
            })?;

        let profile = self
            .profiles
            .insert(&NewUserProfile {
                id: identity.id.clone(),
                email: identity.email.clone(),
                name: invite.name.clone(),
                role: invite.role,
            })
            .await
            .map_err(map_profile_error)?;

        if let Err(error) = self.invites.delete(&invite.email).await {
            warn!(%error, email = invite.email.as_str(), "redeemed invite left behind");
        }

        let actor = Actor::new(profile.id.clone(), profile.role);
        self.audit
            .record(
                "profile_created",
                EntityKind::Users,
                profile.id.as_str(),
                &actor,
                json!({ "role": profile.role }),
            )
            .await;
        Ok(profile)
    }

    fn require(&self, actor: &Actor, capability: Capability) -> Result<(), DomainError> {
        if actor.role.allows(capability) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "role {} may not manage users",
                actor.role
            )))
        }
    }
}
