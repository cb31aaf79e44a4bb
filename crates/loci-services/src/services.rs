use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::{Duration, Utc};
use loci_core::{Folder, Note, NoteStatus, SearchResult};
use loci_store::LociStore;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::info;

/// Raised when a folder delete is refused: the folder still holds notes of
/// its own while child folders hang off it. A childless folder, or one whose
/// note count is zero, deletes without complaint (the caller cascades the
/// children itself).
#[derive(Debug, Error)]
#[error("folder {folder_id} still holds notes and has child folders")]
pub struct FolderDeleteBlocked {
    pub folder_id: String,
}

pub struct AppServicesBuilder {
    pub db_path: PathBuf,
}

impl AppServicesBuilder {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn build(self) -> Result<AppServices> {
        let store = LociStore::open(self.db_path)?;
        let notes = store.list_notes()?;
        let folders = store.list_folders()?;

        Ok(AppServices {
            store: Arc::new(store),
            notes: Arc::new(Mutex::new(notes)),
            folders: Arc::new(Mutex::new(folders)),
        })
    }
}

/// Application-level facade over the store plus in-memory snapshots of both
/// collections. Queries (search, breadcrumbs, tree listings) run against the
/// snapshots; every mutation writes through to sqlite and then reloads them.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<LociStore>,
    notes: Arc<Mutex<Vec<Note>>>,
    folders: Arc<Mutex<Vec<Folder>>>,
}

impl AppServices {
    pub fn list_notes(&self) -> Vec<Note> {
        self.notes.lock().clone()
    }

    pub fn list_folders(&self) -> Vec<Folder> {
        self.folders.lock().clone()
    }

    pub fn upsert_note(&self, note: &Note) -> Result<()> {
        self.store.upsert_note(note)?;
        self.store.refresh_note_counts()?;
        self.reload_snapshots()?;
        info!(note_id = %note.id, "note saved");
        Ok(())
    }

    pub fn delete_note(&self, note_id: &str) -> Result<()> {
        self.store.delete_note(note_id)?;
        self.store.refresh_note_counts()?;
        self.reload_snapshots()?;
        info!(note_id, "note deleted");
        Ok(())
    }

    pub fn upsert_folder(&self, folder: &Folder) -> Result<()> {
        self.store.upsert_folder(folder)?;
        self.reload_snapshots()?;
        info!(folder_id = %folder.id, "folder saved");
        Ok(())
    }

    pub fn delete_folder(&self, folder_id: &str) -> Result<()> {
        {
            let folders = self.folders.lock();
            if !loci_core::can_delete_folder(&folders, folder_id) {
                return Err(FolderDeleteBlocked {
                    folder_id: folder_id.to_owned(),
                }
                .into());
            }
        }
        self.store.delete_folder(folder_id)?;
        self.reload_snapshots()?;
        info!(folder_id, "folder deleted");
        Ok(())
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let notes = self.notes.lock();
        loci_core::search_notes(&notes, query)
    }

    pub fn folder_path(&self, folder_id: &str) -> Vec<Folder> {
        let folders = self.folders.lock();
        loci_core::folder_path(&folders, folder_id)
    }

    pub fn folders_by_parent(&self, parent_id: Option<&str>) -> Vec<Folder> {
        let folders = self.folders.lock();
        loci_core::folders_by_parent(&folders, parent_id)
    }

    /// Starter content for a fresh database. Idempotent: an existing note
    /// collection is left alone.
    pub fn seed_demo_workspace_data(&self) -> Result<()> {
        if !self.list_notes().is_empty() {
            return Ok(());
        }

        let inbox = Folder::new("Inbox");
        self.upsert_folder(&inbox)?;
        let travel = Folder::child_of("Travel", inbox.id.clone());
        self.upsert_folder(&travel)?;

        let mut plan = Note::in_workspace(
            "Trip Plan",
            "<p>Pack light, book the <strong>night train</strong>.</p>",
            "Personal",
        );
        plan.tags = vec!["travel".to_owned(), "checklist".to_owned()];
        plan.folder_id = Some(travel.id.clone());
        self.upsert_note(&plan)?;

        let mut retro = Note::in_workspace(
            "Sprint Retro",
            "<p>What went well, what to change.</p>",
            "Work",
        );
        retro.status = NoteStatus::Review;
        retro.folder_id = Some(inbox.id.clone());
        retro.updated_at = Utc::now() - Duration::days(10);
        self.upsert_note(&retro)?;

        Ok(())
    }

    pub fn export_backup_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        crate::backup::export_backup_json(self, path)
    }

    pub fn import_backup_json(&self, path: impl AsRef<std::path::Path>) -> Result<crate::ImportReport> {
        crate::backup::import_backup_json(self, path)
    }

    fn reload_snapshots(&self) -> Result<()> {
        *self.notes.lock() = self.store.list_notes()?;
        *self.folders.lock() = self.store.list_folders()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_services(label: &str) -> AppServices {
        let mut db_path = std::env::temp_dir();
        db_path.push(format!("loci_services_{label}_{}.db", Uuid::new_v4()));
        AppServicesBuilder::new(db_path).build().expect("build services")
    }

    #[test]
    fn service_can_manage_notes_and_search_them() {
        let services = temp_services("notes");

        let mut note = Note::in_workspace("Trip Plan", "<p>pack light</p>", "Personal");
        note.tags = vec!["travel".to_owned()];
        services.upsert_note(&note).expect("upsert note");
        assert_eq!(services.list_notes().len(), 1);

        let hits = services.search("trip");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].note.id, note.id);
        assert!(hits[0].score >= 30);

        assert!(services.search("").is_empty());

        services.delete_note(&note.id).expect("delete note");
        assert!(services.list_notes().is_empty());
    }

    #[test]
    fn service_maintains_folder_counts_and_paths() {
        let services = temp_services("folders");

        let work = Folder::new("Work");
        services.upsert_folder(&work).expect("upsert work");
        let projects = Folder::child_of("Projects", work.id.clone());
        services.upsert_folder(&projects).expect("upsert projects");

        let mut note = Note::new("Roadmap", "");
        note.folder_id = Some(projects.id.clone());
        services.upsert_note(&note).expect("upsert note");

        let folders = services.list_folders();
        let refreshed = folders
            .iter()
            .find(|entry| entry.id == projects.id)
            .expect("projects folder present");
        assert_eq!(refreshed.note_count, 1);

        let path = services.folder_path(&projects.id);
        let names: Vec<&str> = path.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["Work", "Projects"]);

        let roots = services.folders_by_parent(None);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Work");
    }

    #[test]
    fn delete_guard_blocks_parent_with_notes_and_children() {
        let services = temp_services("guard");

        let parent = Folder::new("Parent");
        services.upsert_folder(&parent).expect("upsert parent");
        let child = Folder::child_of("Child", parent.id.clone());
        services.upsert_folder(&child).expect("upsert child");

        // Parent has a child but no notes of its own: permissive rule allows it.
        services.delete_folder(&parent.id).expect("delete empty parent");
        assert_eq!(services.list_folders().len(), 1);

        let parent = Folder::new("Parent2");
        services.upsert_folder(&parent).expect("upsert parent2");
        let grandchild = Folder::child_of("Grandchild", parent.id.clone());
        services.upsert_folder(&grandchild).expect("upsert grandchild");
        let mut note = Note::new("Kept", "");
        note.folder_id = Some(parent.id.clone());
        services.upsert_note(&note).expect("upsert note");

        let blocked = services.delete_folder(&parent.id);
        assert!(blocked.is_err());
        assert!(
            blocked
                .expect_err("guard error")
                .downcast_ref::<FolderDeleteBlocked>()
                .is_some()
        );
    }

    #[test]
    fn seeding_is_idempotent() {
        let services = temp_services("seed");
        services.seed_demo_workspace_data().expect("seed once");
        let first = services.list_notes().len();
        assert!(first >= 2);
        services.seed_demo_workspace_data().expect("seed twice");
        assert_eq!(services.list_notes().len(), first);
    }
}
