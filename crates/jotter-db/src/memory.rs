use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::StoreError;
use crate::models::{NoteChanges, NoteRow, UserRow};
use crate::store::{NoteStore, UserStore};

/// In-process store with the same observable behaviour as [`crate::Database`]:
/// unique email/username, storage-assigned IDs that are never reused, and
/// not-found on mutation of a missing note. Meant for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, UserRow>,
    notes: BTreeMap<i64, NoteRow>,
    last_user_id: i64,
    last_note_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Storage(anyhow!("memory store lock poisoned: {}", e)))
    }
}

impl UserStore for MemoryStore {
    fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;

        for user in inner.users.values() {
            if user.email == email {
                return Err(StoreError::Conflict { field: "email".into() });
            }
            if user.username == username {
                return Err(StoreError::Conflict { field: "username".into() });
            }
        }

        inner.last_user_id += 1;
        let id = inner.last_user_id;
        inner.users.insert(
            id,
            UserRow {
                id,
                email: email.to_string(),
                username: username.to_string(),
                password: password_hash.to_string(),
                role: None,
            },
        );
        Ok(id)
    }

    fn find_by_email(&self, email: &str) -> Result<UserRow, StoreError> {
        self.lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn find_by_id(&self, id: i64) -> Result<UserRow, StoreError> {
        self.lock()?.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }
}

impl NoteStore for MemoryStore {
    fn create_note(&self, user_id: i64, title: &str, description: &str) -> Result<i64, StoreError> {
        // Mirrors the CHECK constraints on the notes table.
        if title.is_empty() || description.is_empty() {
            return Err(StoreError::Storage(anyhow!(
                "CHECK constraint failed: title and description must be non-empty"
            )));
        }

        let mut inner = self.lock()?;
        inner.last_note_id += 1;
        let id = inner.last_note_id;
        inner.notes.insert(
            id,
            NoteRow {
                id,
                user_id,
                title: title.to_string(),
                description: description.to_string(),
            },
        );
        Ok(id)
    }

    fn list_notes(&self) -> Result<Vec<NoteRow>, StoreError> {
        Ok(self.lock()?.notes.values().cloned().collect())
    }

    fn get_note(&self, id: i64) -> Result<NoteRow, StoreError> {
        self.lock()?.notes.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn update_note(&self, id: i64, changes: &NoteChanges) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let note = inner.notes.get_mut(&id).ok_or(StoreError::NotFound)?;
        note.user_id = changes.user_id;
        note.title = changes.title.clone();
        note.description = changes.description.clone();
        Ok(())
    }

    fn delete_note(&self, id: i64) -> Result<(), StoreError> {
        self.lock()?
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
