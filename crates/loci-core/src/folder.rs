use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named container in the folder forest. `parent_id` of `None` means the
/// folder sits at the root level. `note_count` is denormalized and refreshed
/// by the persistence layer, never by the hierarchy queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub color: String,
    pub note_count: u32,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parent_id: None,
            color: "slate".to_owned(),
            note_count: 0,
        }
    }

    pub fn child_of(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new(name)
        }
    }
}
