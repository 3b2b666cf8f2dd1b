use crate::models::{CreateNotePayload, NoteTag};

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MAX_TITLE_LENGTH: usize = 50;
pub const MAX_CONTENT_LENGTH: usize = 500;

/// Form field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
    Tag,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Content => "Content",
            Field::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All field errors of one form submission, in field order
#[derive(Debug, Clone, PartialEq, Default, thiserror::Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn join_messages(errors: &[FieldError]) -> String {
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    messages.join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for a field, if it failed
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn field_error(field: Field, message: impl Into<String>) -> FieldError {
    FieldError {
        field,
        message: message.into(),
    }
}

pub fn validate_title(title: &str) -> Result<(), FieldError> {
    let len = title.chars().count();

    if len == 0 {
        return Err(field_error(Field::Title, "Title is required"));
    }
    if len < MIN_TITLE_LENGTH {
        return Err(field_error(
            Field::Title,
            format!("Title must be at least {} characters", MIN_TITLE_LENGTH),
        ));
    }
    if len > MAX_TITLE_LENGTH {
        return Err(field_error(
            Field::Title,
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }

    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), FieldError> {
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(field_error(
            Field::Content,
            format!("Content must be at most {} characters", MAX_CONTENT_LENGTH),
        ));
    }

    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<NoteTag, FieldError> {
    tag.parse::<NoteTag>()
        .map_err(|e| field_error(Field::Tag, e.to_string()))
}

/// Raw, unvalidated values of the creation form
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

impl NoteDraft {
    /// Checks every field and only yields a payload when all of them pass.
    pub fn validate(&self) -> Result<CreateNotePayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Err(e) = validate_title(&self.title) {
            errors.errors.push(e);
        }
        if let Err(e) = validate_content(&self.content) {
            errors.errors.push(e);
        }
        let tag = match validate_tag(&self.tag) {
            Ok(tag) => Some(tag),
            Err(e) => {
                errors.errors.push(e);
                None
            }
        };

        match tag {
            Some(tag) if errors.is_empty() => Ok(CreateNotePayload {
                title: self.title.clone(),
                content: self.content.clone(),
                tag,
            }),
            _ => Err(errors),
        }
    }
}

impl CreateNotePayload {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        NoteDraft::from(self.clone()).validate().map(|_| ())
    }
}

impl From<CreateNotePayload> for NoteDraft {
    fn from(payload: CreateNotePayload) -> Self {
        NoteDraft {
            title: payload.title,
            content: payload.content,
            tag: payload.tag.to_string(),
        }
    }
}
