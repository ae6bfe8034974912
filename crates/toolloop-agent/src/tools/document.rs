//! Document drafting tools: `update` replaces the draft, `save` writes it.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::base::{require_string, Tool};

/// Auxiliary state of the drafter agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    /// Current document text.
    pub document: String,
    /// Directory saved documents are written to.
    pub dir: PathBuf,
    /// Where the document was last saved, if anywhere.
    pub saved_to: Option<PathBuf>,
}

impl Draft {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            document: String::new(),
            dir: dir.into(),
            saved_to: None,
        }
    }
}

// ─────────────────────────────────────────────
// update
// ─────────────────────────────────────────────

/// Replace the whole document with new content.
pub struct UpdateTool;

impl Tool<Draft> for UpdateTool {
    fn name(&self) -> &str {
        "update"
    }

    fn description(&self) -> &str {
        "Updates the document with the provided content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The complete new document text"
                }
            },
            "required": ["content"]
        })
    }

    fn execute(&self, params: &HashMap<String, Value>, draft: &mut Draft) -> anyhow::Result<String> {
        draft.document = require_string(params, "content")?;
        Ok(format!(
            "Document has been updated successfully! The current content is:\n{}",
            draft.document
        ))
    }
}

// ─────────────────────────────────────────────
// save
// ─────────────────────────────────────────────

/// Write the document to a text file inside the draft directory.
pub struct SaveTool;

impl Tool<Draft> for SaveTool {
    fn name(&self) -> &str {
        "save"
    }

    fn description(&self) -> &str {
        "Save the current document to a text file and finish the process."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name for the text file"
                }
            },
            "required": ["filename"]
        })
    }

    fn execute(&self, params: &HashMap<String, Value>, draft: &mut Draft) -> anyhow::Result<String> {
        let filename = require_string(params, "filename")?;
        let filename = with_txt_extension(filename.trim());
        let target = resolve_in_dir(&draft.dir, &filename)?;

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&target, &draft.document)
            .with_context(|| format!("writing {}", target.display()))?;

        info!(path = %target.display(), bytes = draft.document.len(), "document saved");
        draft.saved_to = Some(target);
        Ok(format!("Document has been saved successfully to '{filename}'."))
    }
}

fn with_txt_extension(name: &str) -> String {
    if name.ends_with(".txt") {
        name.to_string()
    } else {
        format!("{name}.txt")
    }
}

/// Join `name` onto `dir`, refusing anything that could leave `dir`.
fn resolve_in_dir(dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let rel = Path::new(name);
    let file_like = rel.file_name().is_some();
    if !file_like || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        anyhow::bail!("invalid filename '{name}': must be a relative path inside the document directory");
    }
    Ok(dir.join(rel))
}
