use std::io::{self, Read, Write};

use anyhow::Context;
use notehub_core::{CreateNotePayload, NoteDraft, NoteTag};
use serde::{Deserialize, Serialize};

use crate::args::NoteCreateArgs;

/// Front matter of the note template; the body after `+++` is the content.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct EditorTemplate {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(skip)]
    pub content: String,
}

fn default_tag() -> String {
    NoteTag::default().to_string()
}

impl EditorTemplate {
    pub fn from_args(args: &NoteCreateArgs) -> Self {
        EditorTemplate {
            title: args.title.clone().unwrap_or_default(),
            tag: args.tag.clone(),
            content: args.content.clone().unwrap_or_default(),
        }
    }

    /// Renders the template the editor is opened with.
    pub fn render(&self) -> anyhow::Result<String> {
        let front = toml::to_string(self).context("Failed to render note template")?;
        let tags = NoteTag::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("{}# tag: one of {}\n+++\n{}", front, tags, self.content))
    }

    pub fn into_draft(self) -> NoteDraft {
        NoteDraft {
            title: self.title,
            content: self.content,
            tag: self.tag,
        }
    }
}

pub struct Editor {
    template: String,
}

impl Editor {
    pub fn new(template: &str) -> Self {
        Editor {
            template: template.to_string(),
        }
    }

    /// Format error message as safe TOML comments
    fn format_error_header(error: &str, content: &str) -> String {
        let error_lines = error
            .lines()
            .map(|line| format!("# {}", line))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "# ===== INVALID NOTE =====\n{}\n# ===== Fix the issue below and save again =====\n\n{}",
            error_lines,
            strip_error_header(content)
        )
    }

    fn read_from_file(&self, tempfile: tempfile::NamedTempFile) -> anyhow::Result<String> {
        let editor = std::env::var("VISUAL")
            .unwrap_or_else(|_| std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string()));

        let mut child = std::process::Command::new(editor)
            .arg(tempfile.path())
            .spawn()
            .context("Failed to open editor")?;

        let status = child.wait().context("Failed to wait for editor")?;

        if !status.success() {
            return Err(anyhow::anyhow!("Editor returned non-zero exit code"));
        }

        let mut content = String::new();
        let mut file =
            std::fs::File::open(tempfile.path()).context("Failed to open temporary file")?;
        file.read_to_string(&mut content)
            .context("Failed to read temporary file")?;

        Ok(content)
    }

    fn edit(&self, template: &str) -> anyhow::Result<String> {
        let mut tempfile = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .context("Failed to create temporary file")?;

        tempfile
            .write_all(template.as_bytes())
            .context("Failed to write initial content")?;

        self.read_from_file(tempfile)
    }

    /// Opens the editor until the note parses and passes validation,
    /// or the user gives up.
    pub fn open(&self) -> anyhow::Result<CreateNotePayload> {
        let mut current_content = self.template.clone();

        loop {
            print!("\x1B[?1049h");
            io::stdout().flush()?;

            let edited = self.edit(&current_content);

            print!("\x1B[?1049l");
            io::stdout().flush()?;

            let edited = edited?;

            let problem = match edited.parse_template() {
                Ok(parsed) => match parsed.into_draft().validate() {
                    Ok(payload) => return Ok(payload),
                    Err(errors) => errors
                        .errors
                        .iter()
                        .map(|e| e.message.clone())
                        .collect::<Vec<_>>()
                        .join("\n"),
                },
                Err(e) => format!("{:#}", e),
            };

            cliclack::log::error(&problem)?;

            let retry = cliclack::confirm("Re-open the editor with your changes?")
                .initial_value(true)
                .interact()?;

            if !retry {
                return Err(anyhow::anyhow!("Note creation aborted"));
            }

            current_content = Self::format_error_header(&problem, &edited);
        }
    }
}

/// Drops the error block a previous attempt prepended.
fn strip_error_header(content: &str) -> &str {
    const END: &str = "# ===== Fix the issue below and save again =====\n\n";

    match content.find(END) {
        Some(pos) => &content[pos + END.len()..],
        None => content,
    }
}

pub trait ParseTemplate {
    fn parse_template(&self) -> anyhow::Result<EditorTemplate>;
}

impl ParseTemplate for String {
    fn parse_template(&self) -> anyhow::Result<EditorTemplate> {
        let lines: Vec<&str> = self.lines().collect();

        // The first line that is only +++ separates front matter from content
        let delimiter_pos = lines.iter().position(|line| line.trim() == "+++");

        let (toml_lines, content_lines) = match delimiter_pos {
            Some(pos) => (&lines[..pos], &lines[pos + 1..]),
            None => (lines.as_slice(), &[] as &[&str]),
        };

        let toml_string = toml_lines.join("\n");
        let mut parsed = toml::from_str::<EditorTemplate>(&toml_string)
            .context("Note header is not valid TOML")?;

        parsed.content = content_lines.join("\n").trim_end().to_string();

        Ok(parsed)
    }
}
