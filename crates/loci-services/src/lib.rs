mod backup;
mod services;

pub use backup::{BACKUP_SCHEMA_VERSION, ImportReport};
pub use services::{AppServices, AppServicesBuilder, FolderDeleteBlocked};
