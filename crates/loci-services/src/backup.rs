use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use loci_core::{Folder, Note};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppServices;

pub const BACKUP_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct BackupPayload {
    schema_version: u32,
    folders: Vec<Folder>,
    notes: Vec<Note>,
}

/// Per-type counts of the records an import touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportReport {
    pub notes: usize,
    pub folders: usize,
}

pub fn export_backup_json(services: &AppServices, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create backup dir {}", parent.display()))?;
    }

    let payload = BackupPayload {
        schema_version: BACKUP_SCHEMA_VERSION,
        folders: services.list_folders(),
        notes: services.list_notes(),
    };

    fs::write(path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("failed to write backup {}", path.display()))?;
    info!(path = %path.display(), "backup exported");
    Ok(())
}

/// Upsert every record from a backup file into the current database.
/// Folders land first so the notes' folder references resolve against a
/// populated collection.
pub fn import_backup_json(services: &AppServices, path: impl AsRef<Path>) -> Result<ImportReport> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read backup {}", path.display()))?;
    let payload: BackupPayload =
        serde_json::from_str(&raw).context("failed to parse backup json")?;

    if payload.schema_version > BACKUP_SCHEMA_VERSION {
        return Err(anyhow!(
            "backup schema version {} is newer than supported version {}",
            payload.schema_version,
            BACKUP_SCHEMA_VERSION
        ));
    }

    let mut report = ImportReport::default();
    for folder in &payload.folders {
        services.upsert_folder(folder)?;
        report.folders += 1;
    }
    for note in &payload.notes {
        services.upsert_note(note)?;
        report.notes += 1;
    }

    info!(
        notes = report.notes,
        folders = report.folders,
        "backup imported"
    );
    Ok(report)
}
