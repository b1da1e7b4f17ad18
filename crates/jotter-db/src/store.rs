use crate::StoreError;
use crate::models::{NoteChanges, NoteRow, UserRow};

/// User directory. Lookups return [`StoreError::NotFound`] when no row
/// matches; uniqueness violations on create surface as
/// [`StoreError::Conflict`].
pub trait UserStore: Send + Sync {
    /// Insert a user and return the storage-assigned ID.
    fn create_user(&self, email: &str, username: &str, password_hash: &str)
    -> Result<i64, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<UserRow, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<UserRow, StoreError>;
}

/// Note repository. Update and delete report [`StoreError::NotFound`] for a
/// missing ID instead of silently touching zero rows.
pub trait NoteStore: Send + Sync {
    fn create_note(&self, user_id: i64, title: &str, description: &str) -> Result<i64, StoreError>;

    /// Every note, oldest first, regardless of owner.
    fn list_notes(&self) -> Result<Vec<NoteRow>, StoreError>;

    fn get_note(&self, id: i64) -> Result<NoteRow, StoreError>;

    fn update_note(&self, id: i64, changes: &NoteChanges) -> Result<(), StoreError>;

    fn delete_note(&self, id: i64) -> Result<(), StoreError>;
}
