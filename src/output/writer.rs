// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where command results touch stdout or
//! the filesystem.

use super::types::DeliveryTarget;
use crate::config::private_file_options;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Renders a value as indented JSON with a trailing newline.
///
/// Maps keyed by table or record ID are ordered maps, so the text is
/// deterministic for the same input.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Renders `value` and sends it to `output`, or stdout when `None`.
pub fn emit_json<T: Serialize + ?Sized>(
    value: &T,
    output: Option<&Path>,
) -> Result<usize> {
    let content = render_json(value)?;
    deliver(&DeliveryTarget::for_output(
        output.map(PathBuf::from),
        content,
    ))
}

/// Performs one delivery and returns the number of bytes written.
pub fn deliver(target: &DeliveryTarget) -> Result<usize> {
    match target {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content)?,
        DeliveryTarget::PrintToStdout { content } => print_to_stdout(content)?,
    }
    Ok(target.content().len())
}

/// Writes content to a file with owner-only permissions.
fn write_file(path: &Path, content: &str) -> Result<()> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    let mut file = private_file_options().open(path)?;
    file.write_all(content.as_bytes())?;

    log::info!("Wrote file: {}", path.display());
    Ok(())
}

fn print_to_stdout(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn json_is_indented_sorted_and_newline_terminated() {
        let mut counts = BTreeMap::new();
        counts.insert("space", 1);
        counts.insert("block", 3);
        let text = render_json(&json!({"counts": counts})).unwrap();
        assert_eq!(
            text,
            "{\n  \"counts\": {\n    \"block\": 3,\n    \"space\": 1\n  }\n}\n"
        );
    }

    #[test]
    fn file_delivery_writes_owner_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let written = emit_json(&json!({"ok": true}), Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, text.len());
        assert_eq!(text, "{\n  \"ok\": true\n}\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn target_is_a_file_only_when_a_path_is_given() {
        let to_stdout = DeliveryTarget::for_output(None, "{}\n".to_string());
        assert!(matches!(to_stdout, DeliveryTarget::PrintToStdout { .. }));

        let to_file =
            DeliveryTarget::for_output(Some(PathBuf::from("out.json")), "{}\n".to_string());
        assert!(matches!(
            &to_file,
            DeliveryTarget::WriteFile { path, .. } if path == Path::new("out.json")
        ));
        assert_eq!(to_file.content(), "{}\n");
    }
}
