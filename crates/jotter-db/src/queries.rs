use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::{NoteChanges, NoteRow, UserRow};
use crate::store::{NoteStore, UserStore};
use crate::{Database, StoreError};

const USER_COLUMNS: &str = "id, email, username, password, role";
const NOTE_COLUMNS: &str = "id, user_id, title, description";

impl UserStore for Database {
    fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let id: i64 = conn.query_row(
                "INSERT INTO users (email, username, password) VALUES (?1, ?2, ?3) RETURNING id",
                (email, username, password_hash),
                |row| row.get(0),
            )?;
            debug!("Created user {} ({})", id, username);
            Ok(id)
        })
    }

    fn find_by_email(&self, email: &str) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    fn find_by_id(&self, id: i64) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }
}

impl NoteStore for Database {
    fn create_note(&self, user_id: i64, title: &str, description: &str) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let id: i64 = conn.query_row(
                "INSERT INTO notes (user_id, title, description) VALUES (?1, ?2, ?3) RETURNING id",
                (user_id, title, description),
                |row| row.get(0),
            )?;
            debug!("Created note {} for user {}", id, user_id);
            Ok(id)
        })
    }

    fn list_notes(&self) -> Result<Vec<NoteRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;
            let rows = stmt
                .query_map([], note_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn get_note(&self, id: i64) -> Result<NoteRow, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                [id],
                note_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
        })
    }

    fn update_note(&self, id: i64, changes: &NoteChanges) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            // SQLite counts matched rows, so an update that leaves values
            // unchanged still reports 1.
            let affected = conn.execute(
                "UPDATE notes SET user_id = ?1, title = ?2, description = ?3 WHERE id = ?4",
                (changes.user_id, &changes.title, &changes.description, id),
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    fn delete_note(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            debug!("Deleted note {}", id);
            Ok(())
        })
    }
}

/// Zero-or-one row lookup on a unique column. `column` is always one of our
/// own literals, never caller input.
fn query_user(
    conn: &Connection,
    column: &str,
    value: impl rusqlite::ToSql,
) -> Result<UserRow, StoreError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
        [value],
        user_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        role: row.get(4)?,
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn changes(user_id: i64, title: &str, description: &str) -> NoteChanges {
        NoteChanges {
            user_id,
            title: title.into(),
            description: description.into(),
        }
    }

    #[test]
    fn create_and_find_user() {
        let db = db();
        let id = db.create_user("a@x.com", "a", "$argon2id$hash").unwrap();
        assert_eq!(id, 1);

        let by_email = db.find_by_email("a@x.com").unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.username, "a");
        assert_eq!(by_email.password, "$argon2id$hash");
        assert_eq!(by_email.role, None);

        assert_eq!(db.find_by_id(id).unwrap(), by_email);
    }

    #[test]
    fn missing_user_is_not_found() {
        let db = db();
        assert!(matches!(db.find_by_email("nobody@x.com"), Err(StoreError::NotFound)));
        assert!(matches!(db.find_by_id(0), Err(StoreError::NotFound)));
        assert!(matches!(db.find_by_id(99), Err(StoreError::NotFound)));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let db = db();
        db.create_user("a@x.com", "a", "h").unwrap();
        match db.create_user("a@x.com", "b", "h") {
            Err(StoreError::Conflict { field }) => assert_eq!(field, "email"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_username_conflicts() {
        let db = db();
        db.create_user("a@x.com", "a", "h").unwrap();
        match db.create_user("b@x.com", "a", "h") {
            Err(StoreError::Conflict { field }) => assert_eq!(field, "username"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn email_is_case_sensitive() {
        let db = db();
        db.create_user("a@x.com", "a", "h").unwrap();
        db.create_user("A@x.com", "A", "h").unwrap();
        assert!(matches!(db.find_by_email("A@X.COM"), Err(StoreError::NotFound)));
    }

    #[test]
    fn note_crud() {
        let db = db();
        let id = db.create_note(1, "t", "d").unwrap();

        let note = db.get_note(id).unwrap();
        assert_eq!(note.user_id, 1);
        assert_eq!(note.title, "t");

        db.update_note(id, &changes(2, "t2", "d2")).unwrap();
        let note = db.get_note(id).unwrap();
        assert_eq!((note.user_id, note.title.as_str(), note.description.as_str()), (2, "t2", "d2"));

        // Same values again still counts as a match
        db.update_note(id, &changes(2, "t2", "d2")).unwrap();

        db.delete_note(id).unwrap();
        assert!(matches!(db.get_note(id), Err(StoreError::NotFound)));
    }

    #[test]
    fn mutations_on_missing_note_are_not_found() {
        let db = db();
        assert!(matches!(db.update_note(5, &changes(1, "t", "d")), Err(StoreError::NotFound)));
        assert!(matches!(db.delete_note(5), Err(StoreError::NotFound)));

        let id = db.create_note(1, "t", "d").unwrap();
        db.delete_note(id).unwrap();
        assert!(matches!(db.delete_note(id), Err(StoreError::NotFound)));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let db = db();
        let first = db.create_note(1, "t", "d").unwrap();
        db.delete_note(first).unwrap();
        let second = db.create_note(1, "t", "d").unwrap();
        assert!(second > first);
    }

    #[test]
    fn list_returns_every_owner() {
        let db = db();
        db.create_note(1, "one", "d").unwrap();
        db.create_note(2, "two", "d").unwrap();

        let titles: Vec<String> = db.list_notes().unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["one", "two"]);
    }

    #[test]
    fn empty_title_is_storage_error() {
        let db = db();
        assert!(matches!(db.create_note(1, "", "d"), Err(StoreError::Storage(_))));
    }

    #[test]
    fn reopen_keeps_data() {
        let dir = std::env::temp_dir().join(format!("jotter-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("notes.db");
        let _ = std::fs::remove_file(&path);

        {
            let db = Database::open(&path).unwrap();
            db.create_user("a@x.com", "a", "h").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.find_by_email("a@x.com").unwrap().id, 1);

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
