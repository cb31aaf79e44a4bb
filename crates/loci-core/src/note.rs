use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Writing-pipeline stage of a note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    Idea,
    Research,
    Outline,
    Draft,
    Review,
    Done,
}

impl NoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteStatus::Idea => "idea",
            NoteStatus::Research => "research",
            NoteStatus::Outline => "outline",
            NoteStatus::Draft => "draft",
            NoteStatus::Review => "review",
            NoteStatus::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idea" => Some(NoteStatus::Idea),
            "research" => Some(NoteStatus::Research),
            "outline" => Some(NoteStatus::Outline),
            "draft" => Some(NoteStatus::Draft),
            "review" => Some(NoteStatus::Review),
            "done" => Some(NoteStatus::Done),
            _ => None,
        }
    }
}

/// A user-authored note. `content` is a rich-text HTML fragment; the search
/// ranker strips the markup before scoring and never writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub workspace: String,
    pub status: NoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            workspace: String::new(),
            status: NoteStatus::Idea,
            folder_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_workspace(
        title: impl Into<String>,
        content: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            ..Self::new(title, content)
        }
    }
}
