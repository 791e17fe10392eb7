use anyhow::{Context, Result};
use std::{fs, path::Path, process::Command};

/// Configured editor, then `$VISUAL`, then `$EDITOR`, then `vim`.
pub fn resolve_editor(editor: &Option<String>) -> String {
    editor
        .as_deref()
        .map(str::to_string)
        .or_else(|| std::env::var("VISUAL").ok())
        .or_else(|| std::env::var("EDITOR").ok())
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vim".into())
}

/// Opens `initial` in the editor and returns the buffer once the editor exits.
pub fn create_editor_buffer(editor_cmd: &str, initial: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("quill")
        .suffix(".md")
        .tempfile()
        .context("creating editor buffer")?;

    let path = file.path().to_path_buf();
    fs::write(&path, initial).with_context(|| format!("writing {}", path.display()))?;
    open_file_in_editor(editor_cmd, &path)?;
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

/// [`create_editor_buffer`] on the blocking pool, so runtime tasks keep running
/// while the editor is open.
pub async fn edit_buffer(editor_cmd: String, initial: String) -> Result<String> {
    tokio::task::spawn_blocking(move || create_editor_buffer(&editor_cmd, &initial))
        .await
        .context("editor task failed")?
}

/// Runs the editor on `path`. `editor_cmd` may carry arguments, e.g. `code --wait`.
pub fn open_file_in_editor(editor_cmd: &str, path: &Path) -> Result<()> {
    let mut parts = editor_cmd.split_whitespace();
    let program = parts.next().context("empty editor command")?;
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("launching editor '{editor_cmd}'"))?;
    if !status.success() {
        anyhow::bail!("Editor exited with status {}", status);
    }
    Ok(())
}
