pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS folders (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        parent_id TEXT,
        color TEXT NOT NULL,
        note_count INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        tags_json TEXT NOT NULL,
        workspace TEXT NOT NULL,
        status TEXT NOT NULL,
        folder_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes(updated_at)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_notes_folder ON notes(folder_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id)
    "#,
];
