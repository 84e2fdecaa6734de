//! Task use-cases: scoped listing, creation and resolution.

use std::sync::Arc;

use serde_json::json;

use super::access::{Actor, sort_recent_in_memory};
use super::audit::EntityKind;
use super::audit_service::AuditRecorder;
use super::error::DomainError;
use super::identity::RecordId;
use super::ports::{NewTodoRecord, TodoRepository, TodoRepositoryError};
use super::role::Capability;
use super::todo::{NewTodo, Todo, TodoStatus};

/// Per-client listing ceiling, matching the store rule set.
const CLIENT_LIST_LIMIT: usize = 100;
/// Records fetched for a scoped recent listing before the in-memory sort.
const SCOPED_RECENT_FETCH: usize = 50;
/// Records fetched for the unrestricted open listing; the status filter
/// already rules out store-side ordering, so the fetch is wider.
const OPEN_FETCH: usize = 100;

/// Task service implementing creation, listing and resolution.
pub struct TodoService<R> {
    todos: Arc<R>,
    audit: AuditRecorder,
}

impl<R> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            todos: Arc::clone(&self.todos),
            audit: self.audit.clone(),
        }
    }
}

impl<R> TodoService<R> {
    /// Create a service over the given repository and audit recorder.
    #[must_use]
    pub fn new(todos: Arc<R>, audit: AuditRecorder) -> Self {
        Self { todos, audit }
    }
}

fn map_todo_error(error: TodoRepositoryError) -> DomainError {
    match error {
        TodoRepositoryError::Connection { message } => {
            DomainError::unavailable(format!("todo repository unavailable: {message}"))
        }
        TodoRepositoryError::Query { message } => {
            DomainError::internal(format!("todo repository error: {message}"))
        }
        TodoRepositoryError::Missing { id } => {
            DomainError::not_found(format!("todo {id} does not exist"))
        }
    }
}

impl<R> TodoService<R>
where
    R: TodoRepository,
{
    /// Tasks of one client visible to the caller, newest first.
    pub async fn list_for_client(
        &self,
        actor: &Actor,
        client_id: &RecordId,
    ) -> Result<Vec<Todo>, DomainError> {
        let records = self
            .todos
            .list_for_client(client_id, &actor.scope(), CLIENT_LIST_LIMIT)
            .await
            .map_err(map_todo_error)?;
        Ok(sort_recent_in_memory(
            records,
            |record| record.created_at,
            CLIENT_LIST_LIMIT,
        ))
    }

    /// Most recent open tasks visible to the caller.
    ///
    /// Every path sorts in memory: scoped queries cannot be ordered by the
    /// store, and the unrestricted path trades store-side ordering away to
    /// keep the status filter index-free.
    pub async fn recent_open(
        &self,
        actor: &Actor,
        limit: usize,
    ) -> Result<Vec<Todo>, DomainError> {
        let scope = actor.scope();
        let fetch = if scope.supports_store_ordering() {
            OPEN_FETCH
        } else {
            SCOPED_RECENT_FETCH
        };
        let records = self
            .todos
            .list_open_scoped(&scope, fetch)
            .await
            .map_err(map_todo_error)?;
        Ok(sort_recent_in_memory(
            records,
            |record| record.created_at,
            limit,
        ))
    }

    /// Raise a new task against a client account.
    pub async fn create(&self, actor: &Actor, todo: NewTodo) -> Result<Todo, DomainError> {
        if !actor.role.allows(Capability::CreateTodos) {
            return Err(DomainError::forbidden("role may not create tasks"));
        }
        if !actor.scope().permits_linkage(&todo.linkage) {
            return Err(DomainError::forbidden(
                "caller is not linked to this client account",
            ));
        }

        let record = NewTodoRecord {
            id: RecordId::generate(),
            client_id: todo.client_id,
            title: todo.title,
            description: todo.description.unwrap_or_default(),
            created_by: actor.identity.clone(),
            created_by_role: actor.role,
            audience: todo.audience,
            linkage: todo.linkage,
        };
        let created = self.todos.insert(&record).await.map_err(map_todo_error)?;

        self.audit
            .record(
                "todo_created",
                EntityKind::Todos,
                created.id.as_str(),
                actor,
                json!({
                    "title": created.title,
                    "clientId": created.client_id.as_str(),
                }),
            )
            .await;
        Ok(created)
    }

    /// Resolve an open task addressed to the caller.
    ///
    /// Resolution is the only exercised transition; `cancelled` has no
    /// trigger anywhere in the interface.
    pub async fn resolve(&self, actor: &Actor, id: &RecordId) -> Result<Todo, DomainError> {
        if !actor.role.allows(Capability::ResolveTodos) {
            return Err(DomainError::forbidden("role may not resolve tasks"));
        }

        let current = self
            .todos
            .find_by_id(id)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(|| DomainError::not_found(format!("todo {id} does not exist")))?;
        if !current.addressed_to(&actor.identity, actor.role) {
            return Err(DomainError::forbidden(
                "task is addressed to a different audience",
            ));
        }
        if current.status != TodoStatus::Open {
            return Err(DomainError::conflict(format!(
                "no transition from {:?} to Resolved",
                current.status
            )));
        }

        let resolved = self
            .todos
            .mark_resolved(id)
            .await
            .map_err(map_todo_error)?;

        self.audit
            .record(
                "todo_status_changed",
                EntityKind::Todos,
                resolved.id.as_str(),
                actor,
                json!({
                    "status": resolved.status,
                    "updatedBy": actor.identity.as_str(),
                }),
            )
            .await;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::access::AccessScope;
    use crate::domain::identity::IdentityId;
    use crate::domain::linkage::OwnerLinkage;
    use crate::domain::ports::{FixtureAuditSink, MockTodoRepository};
    use crate::domain::role::Role;
    use crate::domain::todo::TodoAudience;
    use chrono::Utc;

    fn portal_user(id: &str) -> Actor {
        Actor::new(IdentityId::new(id).expect("valid id"), Role::Client)
    }

    fn professional(id: &str) -> Actor {
        Actor::new(IdentityId::new(id).expect("valid id"), Role::Professional)
    }

    fn stored(id: &str, audience: TodoAudience, status: TodoStatus) -> Todo {
        Todo {
            id: RecordId::new(id).expect("valid id"),
            client_id: RecordId::new("c-1").expect("valid id"),
            title: "Send bank statements".into(),
            description: String::new(),
            created_by: IdentityId::new("admin-1").expect("valid id"),
            created_by_role: Role::Admin,
            audience,
            status,
            linkage: OwnerLinkage::new(
                Some(IdentityId::new("login-1").expect("valid id")),
                vec![IdentityId::new("pro-1").expect("valid id")],
            ),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            resolved_at: None,
        }
    }

    fn service(repo: MockTodoRepository) -> TodoService<MockTodoRepository> {
        TodoService::new(Arc::new(repo), AuditRecorder::new(Arc::new(FixtureAuditSink)))
    }

    #[tokio::test]
    async fn linked_user_resolves_their_own_task() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored("t-1", TodoAudience::Client, TodoStatus::Open))));
        repo.expect_mark_resolved().times(1).return_once(|_| {
            let mut resolved = stored("t-1", TodoAudience::Client, TodoStatus::Resolved);
            resolved.resolved_at = Some(Utc::now());
            Ok(resolved)
        });

        let resolved = service(repo)
            .resolve(
                &portal_user("login-1"),
                &RecordId::new("t-1").expect("valid id"),
            )
            .await
            .expect("resolve succeeds");
        assert_eq!(resolved.status, TodoStatus::Resolved);
        assert!(resolved.resolved_at.is_some());
    }

    #[tokio::test]
    async fn wrong_audience_member_is_refused() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored("t-1", TodoAudience::Client, TodoStatus::Open))));
        repo.expect_mark_resolved().times(0);

        let err = service(repo)
            .resolve(
                &professional("pro-1"),
                &RecordId::new("t-1").expect("valid id"),
            )
            .await
            .expect_err("professionals are not the client audience");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn resolved_tasks_stay_resolved() {
        let mut repo = MockTodoRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| {
            Ok(Some(stored(
                "t-1",
                TodoAudience::Client,
                TodoStatus::Resolved,
            )))
        });

        let err = service(repo)
            .resolve(
                &portal_user("login-1"),
                &RecordId::new("t-1").expect("valid id"),
            )
            .await
            .expect_err("already resolved");
        assert_eq!(err.code(), crate::domain::ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn clients_may_not_create_tasks() {
        let repo = MockTodoRepository::new();
        let err = service(repo)
            .create(
                &portal_user("login-1"),
                NewTodo {
                    client_id: RecordId::new("c-1").expect("valid id"),
                    title: "Self-assigned".into(),
                    description: None,
                    audience: TodoAudience::Client,
                    linkage: OwnerLinkage::default(),
                },
            )
            .await
            .expect_err("capability refused");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn recent_open_sorts_and_truncates_for_scoped_callers() {
        let old = stored("t-old", TodoAudience::Professional, TodoStatus::Open);
        let mut newer = stored("t-new", TodoAudience::Professional, TodoStatus::Open);
        newer.created_at = old.created_at + chrono::Duration::minutes(2);
        let handout = vec![old, newer];

        let mut repo = MockTodoRepository::new();
        repo.expect_list_open_scoped()
            .withf(|scope: &AccessScope, limit: &usize| {
                matches!(scope, AccessScope::AssignedProfessional(_)) && *limit == 50
            })
            .times(1)
            .return_once(move |_, _| Ok(handout));

        let recent = service(repo)
            .recent_open(&professional("pro-1"), 1)
            .await
            .expect("recent succeeds");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.first().map(|r| r.id.as_str()), Some("t-new"));
    }
}
