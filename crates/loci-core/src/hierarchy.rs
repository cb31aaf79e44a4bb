use std::collections::HashSet;

use crate::folder::Folder;

/// Ancestor chain for `folder_id`, root-first and target-last.
///
/// An unknown id yields an empty path. A cyclic `parent_id` chain terminates
/// at the first revisited id instead of looping; the truncated chain collected
/// up to that point is returned.
pub fn folder_path(folders: &[Folder], folder_id: &str) -> Vec<Folder> {
    let mut path = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut cursor = Some(folder_id);

    while let Some(id) = cursor {
        if !visited.insert(id) {
            break;
        }
        let Some(folder) = folders.iter().find(|folder| folder.id == id) else {
            break;
        };
        path.push(folder.clone());
        cursor = folder.parent_id.as_deref();
    }

    path.reverse();
    path
}

/// Direct children of `parent_id` (`None` selects the roots), in the input
/// collection's order.
pub fn folders_by_parent(folders: &[Folder], parent_id: Option<&str>) -> Vec<Folder> {
    folders
        .iter()
        .filter(|folder| folder.parent_id.as_deref() == parent_id)
        .cloned()
        .collect()
}

/// Whether `folder_id` may be removed: a folder with no direct children is
/// always removable, and one with children is removable only while its own
/// note count is zero. Cascading removal of the children is the caller's job.
pub fn can_delete_folder(folders: &[Folder], folder_id: &str) -> bool {
    let has_children = folders
        .iter()
        .any(|folder| folder.parent_id.as_deref() == Some(folder_id));
    if !has_children {
        return true;
    }
    folders
        .iter()
        .find(|folder| folder.id == folder_id)
        .is_some_and(|folder| folder.note_count == 0)
}
