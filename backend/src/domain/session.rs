//! Process-wide cache of resolved identity profiles.
//!
//! The gate re-evaluates authentication on every navigation, so profile
//! lookups are cached here for a short staleness window instead of hitting
//! the store each time. Login populates an entry, logout and profile
//! mutations invalidate it. A cached "no profile" answer is kept too: the
//! setup flow invalidates it the moment an invite is redeemed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;

use super::auth::AuthState;
use super::error::DomainError;
use super::identity::{EmailAddress, IdentityId};
use super::ports::{ProfileRepository, ProfileRepositoryError};
use super::profile::UserProfile;

/// Default staleness window for cached profile lookups.
const DEFAULT_TTL_SECONDS: i64 = 30;

struct CachedLookup {
    profile: Option<UserProfile>,
    fetched_at: DateTime<Utc>,
}

/// Caches identity-to-profile resolution for the gate and the extractors.
pub struct ProfileCache<P> {
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedLookup>>,
}

impl<P> ProfileCache<P> {
    /// Create a cache with the default staleness window.
    #[must_use]
    pub fn new(profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(profiles, clock, Duration::seconds(DEFAULT_TTL_SECONDS))
    }

    /// Create a cache with an explicit staleness window.
    #[must_use]
    pub fn with_ttl(profiles: Arc<P>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            profiles,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop the cached lookup for one identity.
    pub fn invalidate(&self, identity: &IdentityId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(identity.as_str());
        }
    }

    /// Drop every cached lookup.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    fn cached(&self, identity: &IdentityId) -> Option<Option<UserProfile>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(identity.as_str())?;
        let age = self.clock.utc().signed_duration_since(entry.fetched_at);
        if age > self.ttl {
            return None;
        }
        Some(entry.profile.clone())
    }

    fn store(&self, identity: &IdentityId, profile: Option<UserProfile>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                identity.as_str().to_owned(),
                CachedLookup {
                    profile,
                    fetched_at: self.clock.utc(),
                },
            );
        }
    }
}

impl<P> ProfileCache<P>
where
    P: ProfileRepository,
{
    /// Resolve the auth state for a session identity.
    ///
    /// A fresh cached lookup is served as-is; otherwise the profile record is
    /// fetched and the answer (present or absent) cached for the staleness
    /// window.
    pub async fn resolve(
        &self,
        identity: &IdentityId,
        email: &EmailAddress,
    ) -> Result<AuthState, DomainError> {
        let profile = match self.cached(identity) {
            Some(profile) => profile,
            None => {
                let fetched = self
                    .profiles
                    .find_by_id(identity)
                    .await
                    .map_err(map_profile_error)?;
                self.store(identity, fetched.clone());
                fetched
            }
        };

        Ok(match profile {
            Some(profile) => AuthState::Authorized(profile),
            None => AuthState::NeedsSetup {
                identity: identity.clone(),
                email: email.clone(),
            },
        })
    }
}

/// Object-safe auth-state resolution for the route guard and extractors.
///
/// The guard holds a trait object so the HTTP layer stays independent of the
/// concrete repository behind the cache.
#[async_trait]
pub trait AuthResolver: Send + Sync {
    /// Resolve the auth state for a session identity.
    async fn resolve_state(
        &self,
        identity: &IdentityId,
        email: &EmailAddress,
    ) -> Result<AuthState, DomainError>;

    /// Drop any cached answer for the identity.
    fn forget(&self, identity: &IdentityId);
}

#[async_trait]
impl<P> AuthResolver for ProfileCache<P>
where
    P: ProfileRepository,
{
    async fn resolve_state(
        &self,
        identity: &IdentityId,
        email: &EmailAddress,
    ) -> Result<AuthState, DomainError> {
        self.resolve(identity, email).await
    }

    fn forget(&self, identity: &IdentityId) {
        self.invalidate(identity);
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

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockProfileRepository;
    use crate::domain::role::Role;
    use mockable::MockClock;

    fn identity() -> IdentityId {
        IdentityId::new("uid-1").expect("valid id")
    }

    fn email() -> EmailAddress {
        EmailAddress::parse("ada@firm.example").expect("valid address")
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: identity(),
            email: email(),
            name: "Ada".into(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn frozen_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().returning(move || now);
        Arc::new(clock)
    }

    #[tokio::test]
    async fn second_resolve_within_ttl_skips_the_store() {
        let mut repo = MockProfileRepository::new();
        let stored = profile();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let cache = ProfileCache::new(Arc::new(repo), frozen_clock(Utc::now()));
        let first = cache.resolve(&identity(), &email()).await.expect("resolves");
        let second = cache.resolve(&identity(), &email()).await.expect("resolves");
        assert_eq!(first, second);
        assert!(matches!(first, AuthState::Authorized(_)));
    }

    #[tokio::test]
    async fn missing_profile_resolves_to_needs_setup() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let cache = ProfileCache::new(Arc::new(repo), frozen_clock(Utc::now()));
        let state = cache.resolve(&identity(), &email()).await.expect("resolves");
        assert!(matches!(state, AuthState::NeedsSetup { .. }));
    }

    #[tokio::test]
    async fn invalidation_forces_a_fresh_lookup() {
        let mut repo = MockProfileRepository::new();
        let stored = profile();
        let mut lookups = vec![Ok(Some(stored)), Ok(None)];
        lookups.reverse();
        repo.expect_find_by_id()
            .times(2)
            .returning(move |_| lookups.pop().unwrap_or(Ok(None)));

        let cache = ProfileCache::new(Arc::new(repo), frozen_clock(Utc::now()));
        let first = cache.resolve(&identity(), &email()).await.expect("resolves");
        assert!(matches!(first, AuthState::Authorized(_)));

        cache.invalidate(&identity());
        let second = cache.resolve(&identity(), &email()).await.expect("resolves");
        assert!(matches!(second, AuthState::NeedsSetup { .. }));
    }

    #[tokio::test]
    async fn stale_entries_are_refetched() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_id().times(2).returning(|_| Ok(None));

        let start = Utc::now();
        let mut clock = MockClock::new();
        let mut calls = 0_u32;
        clock.expect_utc().returning(move || {
            calls += 1;
            // The first resolve stores at `start`; every later observation
            // falls beyond the window.
            if calls <= 1 {
                start
            } else {
                start + Duration::seconds(DEFAULT_TTL_SECONDS + 1)
            }
        });

        let cache = ProfileCache::new(Arc::new(repo), Arc::new(clock));
        let _ = cache.resolve(&identity(), &email()).await.expect("resolves");
        let _ = cache.resolve(&identity(), &email()).await.expect("resolves");
    }

    #[tokio::test]
    async fn store_failures_surface_as_unavailable() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(ProfileRepositoryError::connection("tcp reset")));

        let cache = ProfileCache::new(Arc::new(repo), frozen_clock(Utc::now()));
        let err = cache
            .resolve(&identity(), &email())
            .await
            .expect_err("store failure surfaces");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unavailable);
    }
}
