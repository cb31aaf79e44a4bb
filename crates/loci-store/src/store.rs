use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use loci_core::{Folder, Note, NoteStatus};
use parking_lot::Mutex;
use rusqlite::{Connection, params};

use crate::migrations::MIGRATIONS;

pub struct LociStore {
    conn: Mutex<Connection>,
}

impl LociStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent dir for {}", path.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        conn.pragma_update(None, "foreign_keys", true)?;

        for sql in MIGRATIONS {
            conn.execute(sql, [])
                .with_context(|| format!("failed migration sql: {sql}"))?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn upsert_note(&self, note: &Note) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "
            INSERT INTO notes (id, title, content, tags_json, workspace, status, folder_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
              title = excluded.title,
              content = excluded.content,
              tags_json = excluded.tags_json,
              workspace = excluded.workspace,
              status = excluded.status,
              folder_id = excluded.folder_id,
              updated_at = excluded.updated_at
            ",
            params![
                note.id,
                note.title,
                note.content,
                serde_json::to_string(&note.tags)?,
                note.workspace,
                note.status.as_str(),
                note.folder_id,
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, content, tags_json, workspace, status, folder_id, created_at, updated_at
             FROM notes ORDER BY updated_at DESC",
        )?;

        let mut rows = stmt.query([])?;
        let mut output = Vec::new();

        while let Some(row) = rows.next()? {
            output.push(Note {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                tags: serde_json::from_str(&row.get::<_, String>(3)?).unwrap_or_default(),
                workspace: row.get(4)?,
                status: parse_status(&row.get::<_, String>(5)?)?,
                folder_id: row.get(6)?,
                created_at: parse_date(&row.get::<_, String>(7)?)?,
                updated_at: parse_date(&row.get::<_, String>(8)?)?,
            });
        }

        Ok(output)
    }

    pub fn delete_note(&self, note_id: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM notes WHERE id = ?1", params![note_id])?;
        Ok(())
    }

    pub fn upsert_folder(&self, folder: &Folder) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "
            INSERT INTO folders (id, name, parent_id, color, note_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
              name = excluded.name,
              parent_id = excluded.parent_id,
              color = excluded.color,
              note_count = excluded.note_count
            ",
            params![
                folder.id,
                folder.name,
                folder.parent_id,
                folder.color,
                folder.note_count,
            ],
        )?;
        Ok(())
    }

    /// Folders in insertion order. Breadcrumbs and sibling listings derive
    /// their ordering from this collection order, so no name sort here.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, parent_id, color, note_count FROM folders ORDER BY rowid",
        )?;

        let mut rows = stmt.query([])?;
        let mut output = Vec::new();

        while let Some(row) = rows.next()? {
            output.push(Folder {
                id: row.get(0)?,
                name: row.get(1)?,
                parent_id: row.get(2)?,
                color: row.get(3)?,
                note_count: row.get(4)?,
            });
        }

        Ok(output)
    }

    pub fn delete_folder(&self, folder_id: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM folders WHERE id = ?1", params![folder_id])?;
        Ok(())
    }

    /// Recompute every folder's denormalized note count from `notes.folder_id`.
    pub fn refresh_note_counts(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE folders SET note_count =
               (SELECT COUNT(*) FROM notes WHERE notes.folder_id = folders.id)",
            [],
        )?;
        Ok(())
    }
}

fn parse_status(value: &str) -> Result<NoteStatus> {
    NoteStatus::parse(value).ok_or_else(|| anyhow!("unknown note status: {value}"))
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("invalid datetime {value}"))?
        .with_timezone(&Utc))
}
