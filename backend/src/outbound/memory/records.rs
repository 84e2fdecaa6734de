//! Record-store port implementations over the in-memory maps.

use async_trait::async_trait;

use crate::domain::ports::{
    ClientRepository, ClientRepositoryError, DocumentRepository, DocumentRepositoryError,
    InviteRepository, InviteRepositoryError, NewDocumentRecord, NewTodoRecord, NewUserProfile,
    ProfileRepository, ProfileRepositoryError, TodoRepository, TodoRepositoryError,
};
use crate::domain::{
    AccessScope, ClientAccount, ClientAccountPatch, DocumentFile, DocumentStatus, EmailAddress,
    IdentityId, Invite, NewClientAccount, NewInvite, RecordId, Todo, TodoStatus, UserProfile,
    UserProfilePatch,
};

use super::{MemoryPlatform, read_guard, write_guard};

#[async_trait]
impl ClientRepository for MemoryPlatform {
    async fn list_all_ordered(&self) -> Result<Vec<ClientAccount>, ClientRepositoryError> {
        let mut records: Vec<ClientAccount> =
            read_guard(&self.clients).values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find_by_id(
        &self,
        id: &RecordId,
    ) -> Result<Option<ClientAccount>, ClientRepositoryError> {
        Ok(read_guard(&self.clients).get(id.as_str()).cloned())
    }

    async fn find_active_by_linked_user(
        &self,
        user: &IdentityId,
    ) -> Result<Vec<ClientAccount>, ClientRepositoryError> {
        Ok(read_guard(&self.clients)
            .values()
            .filter(|client| client.active && client.linked_user_id.as_ref() == Some(user))
            .cloned()
            .collect())
    }

    async fn list_assigned_to(
        &self,
        professional: &IdentityId,
        limit: usize,
    ) -> Result<Vec<ClientAccount>, ClientRepositoryError> {
        Ok(read_guard(&self.clients)
            .values()
            .filter(|client| {
                client.active && client.assigned_professional_ids.contains(professional)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        id: &RecordId,
        account: &NewClientAccount,
    ) -> Result<ClientAccount, ClientRepositoryError> {
        let now = self.now();
        let record = ClientAccount {
            id: id.clone(),
            linked_user_id: account.linked_user_id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            assigned_professional_ids: Vec::new(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        write_guard(&self.clients).insert(id.as_str().to_owned(), record.clone());
        Ok(record)
    }

    async fn merge(
        &self,
        id: &RecordId,
        patch: &ClientAccountPatch,
    ) -> Result<ClientAccount, ClientRepositoryError> {
        let now = self.now();
        let mut clients = write_guard(&self.clients);
        let record = clients
            .get_mut(id.as_str())
            .ok_or_else(|| ClientRepositoryError::missing(id.as_str()))?;
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(email) = &patch.email {
            record.email = Some(email.clone());
        }
        if let Some(link) = &patch.linked_user_id {
            record.linked_user_id = link.clone();
        }
        if let Some(active) = patch.active {
            record.active = active;
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn replace_assignments(
        &self,
        id: &RecordId,
        professional_ids: &[IdentityId],
    ) -> Result<ClientAccount, ClientRepositoryError> {
        let now = self.now();
        let mut clients = write_guard(&self.clients);
        let record = clients
            .get_mut(id.as_str())
            .ok_or_else(|| ClientRepositoryError::missing(id.as_str()))?;
        record.assigned_professional_ids = professional_ids.to_vec();
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ClientRepositoryError> {
        write_guard(&self.clients).remove(id.as_str());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryPlatform {
    async fn list_all(&self) -> Result<Vec<UserProfile>, ProfileRepositoryError> {
        Ok(read_guard(&self.profiles).values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: &IdentityId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(read_guard(&self.profiles).get(id.as_str()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(read_guard(&self.profiles)
            .values()
            .find(|profile| profile.email == *email)
            .cloned())
    }

    async fn insert(
        &self,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, ProfileRepositoryError> {
        let record = UserProfile {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            active: true,
            created_at: self.now(),
        };
        write_guard(&self.profiles).insert(record.id.as_str().to_owned(), record.clone());
        Ok(record)
    }

    async fn merge(
        &self,
        id: &IdentityId,
        patch: &UserProfilePatch,
    ) -> Result<UserProfile, ProfileRepositoryError> {
        let mut profiles = write_guard(&self.profiles);
        let record = profiles
            .get_mut(id.as_str())
            .ok_or_else(|| ProfileRepositoryError::missing(id.as_str()))?;
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(active) = patch.active {
            record.active = active;
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), ProfileRepositoryError> {
        write_guard(&self.profiles).remove(id.as_str());
        Ok(())
    }
}

#[async_trait]
impl InviteRepository for MemoryPlatform {
    async fn list_all(&self) -> Result<Vec<Invite>, InviteRepositoryError> {
        Ok(read_guard(&self.invites).values().cloned().collect())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Invite>, InviteRepositoryError> {
        Ok(read_guard(&self.invites).get(email.as_str()).cloned())
    }

    async fn put(&self, invite: &NewInvite) -> Result<Invite, InviteRepositoryError> {
        let record = Invite {
            email: invite.email.clone(),
            name: invite.name.clone(),
            role: invite.role,
            created_at: self.now(),
        };
        write_guard(&self.invites).insert(record.email.as_str().to_owned(), record.clone());
        Ok(record)
    }

    async fn delete(&self, email: &EmailAddress) -> Result<(), InviteRepositoryError> {
        write_guard(&self.invites).remove(email.as_str());
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for MemoryPlatform {
    async fn find_by_id(
        &self,
        id: &RecordId,
    ) -> Result<Option<DocumentFile>, DocumentRepositoryError> {
        Ok(read_guard(&self.documents).get(id.as_str()).cloned())
    }

    async fn list_for_client(
        &self,
        client_id: &RecordId,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError> {
        Ok(read_guard(&self.documents)
            .values()
            .filter(|record| record.client_id == *client_id && scope.permits_linkage(&record.linkage))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_scoped(
        &self,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError> {
        Ok(read_guard(&self.documents)
            .values()
            .filter(|record| scope.permits_linkage(&record.linkage))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_recent_ordered(
        &self,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError> {
        let mut records: Vec<DocumentFile> =
            read_guard(&self.documents).values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn insert(
        &self,
        record: &NewDocumentRecord,
    ) -> Result<DocumentFile, DocumentRepositoryError> {
        let now = self.now();
        let stored = DocumentFile {
            id: record.id.clone(),
            client_id: record.client_id.clone(),
            uploaded_by: record.uploaded_by.clone(),
            uploaded_by_role: record.uploaded_by_role,
            category: record.category.clone(),
            note: record.note.clone(),
            file_name: record.file_name.clone(),
            file_type: record.file_type.clone(),
            file_size: record.file_size,
            storage_path: record.storage_path.clone(),
            download_url: record.download_url.clone(),
            status: DocumentStatus::Pending,
            linkage: record.linkage.clone(),
            created_at: now,
            updated_at: now,
        };
        write_guard(&self.documents).insert(stored.id.as_str().to_owned(), stored.clone());
        Ok(stored)
    }

    async fn merge_status<'a>(
        &'a self,
        id: &'a RecordId,
        status: DocumentStatus,
        note: Option<&'a str>,
    ) -> Result<DocumentFile, DocumentRepositoryError> {
        let now = self.now();
        let mut documents = write_guard(&self.documents);
        let record = documents
            .get_mut(id.as_str())
            .ok_or_else(|| DocumentRepositoryError::missing(id.as_str()))?;
        record.status = status;
        if let Some(note) = note {
            record.note = note.to_owned();
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), DocumentRepositoryError> {
        write_guard(&self.documents).remove(id.as_str());
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MemoryPlatform {
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Todo>, TodoRepositoryError> {
        Ok(read_guard(&self.todos).get(id.as_str()).cloned())
    }

    async fn list_for_client(
        &self,
        client_id: &RecordId,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        Ok(read_guard(&self.todos)
            .values()
            .filter(|record| record.client_id == *client_id && scope.permits_linkage(&record.linkage))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_open_scoped(
        &self,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        Ok(read_guard(&self.todos)
            .values()
            .filter(|record| {
                record.status == TodoStatus::Open && scope.permits_linkage(&record.linkage)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &NewTodoRecord) -> Result<Todo, TodoRepositoryError> {
        let now = self.now();
        let stored = Todo {
            id: record.id.clone(),
            client_id: record.client_id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            created_by: record.created_by.clone(),
            created_by_role: record.created_by_role,
            audience: record.audience,
            status: TodoStatus::Open,
            linkage: record.linkage.clone(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        write_guard(&self.todos).insert(stored.id.as_str().to_owned(), stored.clone());
        Ok(stored)
    }

    async fn mark_resolved(&self, id: &RecordId) -> Result<Todo, TodoRepositoryError> {
        let now = self.now();
        let mut todos = write_guard(&self.todos);
        let record = todos
            .get_mut(id.as_str())
            .ok_or_else(|| TodoRepositoryError::missing(id.as_str()))?;
        record.status = TodoStatus::Resolved;
        record.resolved_at = Some(now);
        record.updated_at = now;
        Ok(record.clone())
    }
}
