//! Tree renderer
//!
//! Renders a local repository directory as an indented tree with box-drawing
//! connectors and a per-kind glyph. Purely presentational; nothing here
//! touches the lazy node machinery.

use std::path::Path;

use crate::core::scanner::is_excluded;
use crate::error::ScanError;

/// Directory names skipped on top of the usual hidden-entry rules
const IGNORED: &[&str] = &["venv", "env", "node_modules", "target"];

/// Glyphs per entry kind
const GLYPH_DIR: &str = "📁";
const GLYPH_SOURCE: &str = "📜";
const GLYPH_CONFIG: &str = "📋";
const GLYPH_DOC: &str = "📝";
const GLYPH_IMAGE: &str = "🖼️";
const GLYPH_FILE: &str = "📄";

/// Render the directory tree rooted at `path`
///
/// Directories sort before files, both alphabetically. The same entries the
/// scanner hides are hidden here too.
pub fn render_tree(path: &Path) -> Result<String, ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let mut out = format!("{GLYPH_DIR} {name}");
    if path.is_dir() {
        render_dir(path, "   ", &mut out)?;
    }
    Ok(out)
}

fn render_dir(path: &Path, prefix: &str, out: &mut String) -> Result<(), ScanError> {
    let read_err = |e: std::io::Error| ScanError::ReadDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_excluded(&name) || IGNORED.contains(&name.as_str()) {
            continue;
        }
        if entry.path().is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    let total = dirs.len() + files.len();
    let mut index = 0;

    for name in &dirs {
        index += 1;
        let last = index == total;
        let connector = if last { "└──" } else { "├──" };
        out.push_str(&format!("\n{prefix}{connector} {GLYPH_DIR} {name}"));

        let child_prefix = if last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        render_dir(&path.join(name), &child_prefix, out)?;
    }

    for name in &files {
        index += 1;
        let connector = if index == total { "└──" } else { "├──" };
        out.push_str(&format!("\n{prefix}{connector} {} {name}", file_glyph(name)));
    }

    Ok(())
}

fn file_glyph(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("");
    match ext {
        "lzy" => GLYPH_SOURCE,
        "json" | "yaml" | "yml" | "toml" | "xml" => GLYPH_CONFIG,
        "md" | "txt" | "rst" => GLYPH_DOC,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" => GLYPH_IMAGE,
        _ => GLYPH_FILE,
    }
}
