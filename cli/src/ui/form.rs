use std::io;

use notehub_core::{
    validation::{validate_content, validate_tag, validate_title},
    CreateNotePayload, Field, FieldError, NoteDraft, NoteTag, ValidationErrors,
};
use termcolor::{Color, ColorSpec, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Field(Field),
    /// All fields filled; an empty line submits
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Input accepted, the form moved to the next prompt
    Next,
    Invalid(FieldError),
    Submit(CreateNotePayload),
    /// A submission is pending, input is ignored
    Busy,
}

/// Creation form filled one line per field.
///
/// Each field is validated as it is entered; the payload is only handed out
/// once every constraint holds.
#[derive(Debug, Clone)]
pub struct NoteForm {
    draft: NoteDraft,
    step: Step,
    errors: ValidationErrors,
    submitting: bool,
}

impl Default for NoteForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteForm {
    pub fn new() -> Self {
        Self {
            draft: NoteDraft::default(),
            step: Step::Field(Field::Title),
            errors: ValidationErrors::default(),
            submitting: false,
        }
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn current_field(&self) -> Option<Field> {
        match self.step {
            Step::Field(field) => Some(field),
            Step::Confirm => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Shows errors reported for a whole submission and returns to the first failing field.
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        if let Some(first) = errors.errors.first() {
            self.step = Step::Field(first.field);
        }
        self.errors = errors;
    }

    pub fn input(&mut self, line: &str) -> FormOutcome {
        if self.submitting {
            return FormOutcome::Busy;
        }

        match self.step {
            Step::Field(Field::Title) => {
                let title = line.to_string();
                self.accept(validate_title(&title).map(|_| title), |draft, v| draft.title = v)
                    .unwrap_or_else(|| self.advance(Step::Field(Field::Content)))
            }
            Step::Field(Field::Content) => {
                let content = line.to_string();
                self.accept(validate_content(&content).map(|_| content), |draft, v| {
                    draft.content = v
                })
                .unwrap_or_else(|| self.advance(Step::Field(Field::Tag)))
            }
            Step::Field(Field::Tag) => {
                let raw = if line.trim().is_empty() {
                    NoteTag::default().to_string()
                } else {
                    line.to_string()
                };
                self.accept(validate_tag(&raw).map(|tag| tag.to_string()), |draft, v| {
                    draft.tag = v
                })
                .unwrap_or_else(|| self.submit())
            }
            Step::Confirm if line.trim().is_empty() => self.submit(),
            Step::Confirm => FormOutcome::Next,
        }
    }

    /// Stores a valid field value, or records the error and stays on the field.
    fn accept(
        &mut self,
        value: Result<String, FieldError>,
        store: impl FnOnce(&mut NoteDraft, String),
    ) -> Option<FormOutcome> {
        match value {
            Ok(value) => {
                store(&mut self.draft, value);
                if let Some(field) = self.current_field() {
                    self.errors.errors.retain(|e| e.field != field);
                }
                None
            }
            Err(error) => {
                self.errors.errors.retain(|e| e.field != error.field);
                self.errors.errors.push(error.clone());
                Some(FormOutcome::Invalid(error))
            }
        }
    }

    fn advance(&mut self, step: Step) -> FormOutcome {
        self.step = step;
        FormOutcome::Next
    }

    fn submit(&mut self) -> FormOutcome {
        match self.draft.validate() {
            Ok(payload) => {
                self.step = Step::Confirm;
                FormOutcome::Submit(payload)
            }
            Err(errors) => {
                let first = errors.errors.first().cloned();
                self.set_errors(errors);
                match first {
                    Some(error) => FormOutcome::Invalid(error),
                    None => FormOutcome::Next,
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl WriteColor) -> io::Result<()> {
        for field in [Field::Title, Field::Content, Field::Tag] {
            let value = match field {
                Field::Title => &self.draft.title,
                Field::Content => &self.draft.content,
                Field::Tag => &self.draft.tag,
            };

            let marker = if self.current_field() == Some(field) {
                "›"
            } else {
                " "
            };
            writeln!(out, "{} {:<8} {}", marker, format!("{}:", field.label()), value)?;

            if let Some(message) = self.errors.get(field) {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "           {}", message)?;
                out.reset()?;
            }
        }

        writeln!(out)?;
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        match self.current_field() {
            Some(Field::Title) => writeln!(out, "Enter a title (3-50 characters)")?,
            Some(Field::Content) => writeln!(out, "Enter the content (optional, up to 500 characters)")?,
            Some(Field::Tag) => writeln!(
                out,
                "Enter a tag: {} (empty for {})",
                NoteTag::ALL.map(|t| t.as_str()).join(", "),
                NoteTag::default()
            )?,
            None if self.submitting => writeln!(out, "Creating...")?,
            None => writeln!(out, "Press Enter to create note")?,
        }
        out.reset()
    }
}
