//! Application state wiring the domain services to the platform adapters.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::session::AuthResolver;
use crate::domain::{
    AuditRecorder, ClientService, DocumentService, ProfileCache, TodoService, UserService,
};
use crate::domain::ports::{AuditSink, IdentityProvider};
use crate::outbound::MemoryPlatform;

/// Client service bound to the platform adapters.
pub type PortalClientService = ClientService<MemoryPlatform>;
/// Document service bound to the platform adapters.
pub type PortalDocumentService = DocumentService<MemoryPlatform, MemoryPlatform>;
/// Todo service bound to the platform adapters.
pub type PortalTodoService = TodoService<MemoryPlatform>;
/// User/invite service bound to the platform adapters.
pub type PortalUserService = UserService<MemoryPlatform, MemoryPlatform>;
/// Profile cache bound to the platform adapters.
pub type PortalProfileCache = ProfileCache<MemoryPlatform>;

/// Shared handler state.
pub struct PortalState {
    /// The backing platform, kept for seeding and inspection.
    pub platform: Arc<MemoryPlatform>,
    /// Identity provider used by the login handler.
    pub identity: Arc<dyn IdentityProvider>,
    /// Auth-state resolution shared with the guard middleware.
    pub resolver: Arc<dyn AuthResolver>,
    /// Client account use-cases.
    pub clients: PortalClientService,
    /// Document use-cases.
    pub documents: PortalDocumentService,
    /// Task use-cases.
    pub todos: PortalTodoService,
    /// User and invite use-cases.
    pub users: PortalUserService,
}

impl PortalState {
    /// Assemble the services over one platform and an audit sink.
    ///
    /// The sink is separate so deployments can ship audit entries to a
    /// remote collector while records stay on the platform.
    #[must_use]
    pub fn new(
        platform: Arc<MemoryPlatform>,
        audit_sink: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let audit = AuditRecorder::new(audit_sink);
        let cache: Arc<PortalProfileCache> =
            Arc::new(ProfileCache::new(Arc::clone(&platform), clock));
        Self {
            identity: Arc::clone(&platform) as Arc<dyn IdentityProvider>,
            resolver: cache as Arc<dyn AuthResolver>,
            clients: ClientService::new(Arc::clone(&platform), audit.clone()),
            documents: DocumentService::new(
                Arc::clone(&platform),
                Arc::clone(&platform),
                audit.clone(),
            ),
            todos: TodoService::new(Arc::clone(&platform), audit.clone()),
            users: UserService::new(Arc::clone(&platform), Arc::clone(&platform), audit),
            platform,
        }
    }

    /// State over one platform that also receives the audit trail.
    #[must_use]
    pub fn self_contained(platform: Arc<MemoryPlatform>, clock: Arc<dyn Clock>) -> Self {
        let sink = Arc::clone(&platform) as Arc<dyn AuditSink>;
        Self::new(platform, sink, clock)
    }
}
