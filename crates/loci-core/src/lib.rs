pub mod folder;
pub mod hierarchy;
pub mod note;
pub mod search;

pub use folder::Folder;
pub use hierarchy::{can_delete_folder, folder_path, folders_by_parent};
pub use note::{Note, NoteStatus};
pub use search::{SearchResult, search_notes, search_notes_at, strip_html};
