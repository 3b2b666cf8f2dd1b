use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size used by the notes list.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// A note as returned by the NoteHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Opaque identifier assigned by the API
    pub id: String,
    pub title: String,
    /// Note body, may be empty
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fixed set of categories a note can carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseTagError {
    #[error("Tag is required")]
    Missing,
    #[error("Tag must be one of: Todo, Work, Personal, Meeting, Shopping")]
    Unknown(String),
}

impl FromStr for NoteTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseTagError::Missing);
        }

        NoteTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTagError::Unknown(s.to_string()))
    }
}

/// One page of the notes list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

/// Query parameters for listing notes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchNotesParams {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    /// Substring filter, empty means no filter
    pub search: String,
}

impl Default for FetchNotesParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
        }
    }
}

impl FetchNotesParams {
    /// Query string pairs as sent to the API. Blank search is omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
        ];

        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }

        pairs
    }
}

/// Body of a create request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateNotePayload {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}
