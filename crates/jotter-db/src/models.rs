//! Database row types. These map directly to SQLite rows and stay distinct
//! from the jotter-types API models so the password hash cannot leak.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
}

/// Full replacement of a note's mutable columns.
#[derive(Debug, Clone)]
pub struct NoteChanges {
    pub user_id: i64,
    pub title: String,
    pub description: String,
}

impl From<UserRow> for jotter_types::models::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            role: row.role,
        }
    }
}

impl From<NoteRow> for jotter_types::models::Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
        }
    }
}
