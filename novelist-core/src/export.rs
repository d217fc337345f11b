//! Draft export.
//!
//! The export artifact is a plain text file: the title as a heading
//! line, a blank line, then the manuscript verbatim. The filename is
//! derived from the title the same way save paths are sanitized.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Fixed extension for export artifacts.
pub const EXPORT_EXTENSION: &str = "txt";

/// Render the export document.
pub fn render(title: &str, body: &str) -> String {
    format!("{title}\n\n{body}")
}

/// Derive the export filename from the title.
pub fn file_name(title: &str) -> String {
    let sanitized = title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();

    if sanitized.chars().all(|c| c == '_') {
        format!("untitled.{EXPORT_EXTENSION}")
    } else {
        format!("{sanitized}.{EXPORT_EXTENSION}")
    }
}

/// Write the export artifact into `dir`, returning its path.
pub async fn write_export(
    dir: impl AsRef<Path>,
    title: &str,
    body: &str,
) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(&dir).await?;
    let path = dir.as_ref().join(file_name(title));
    fs::write(&path, render(title, body)).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_layout() {
        let document = render("T", "B");
        assert!(document.starts_with("T\n"));
        assert_eq!(document, "T\n\nB");

        let (heading, rest) = document.split_once('\n').unwrap();
        assert_eq!(heading, "T");
        assert_eq!(rest.strip_prefix('\n').unwrap(), "B");
    }

    #[test]
    fn test_render_preserves_body_exactly() {
        let body = "Line one.\n\n  indented line\ntrailing space \n";
        let document = render("The Hollow Season", body);
        assert_eq!(
            document.strip_prefix("The Hollow Season\n\n").unwrap(),
            body
        );
    }

    #[test]
    fn test_file_name_sanitization() {
        assert_eq!(file_name("The Hollow Season"), "The_Hollow_Season.txt");
        assert_eq!(file_name("What's next?!"), "What_s_next__.txt");
        assert_eq!(file_name(""), "untitled.txt");
        assert_eq!(file_name("  ?! "), "untitled.txt");
    }

    #[tokio::test]
    async fn test_write_export() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let path = write_export(dir.path(), "The Hollow Season", "It began with a letter.")
            .await
            .expect("Export should succeed");

        assert!(path.ends_with("The_Hollow_Season.txt"));
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "The Hollow Season\n\nIt began with a letter.");
    }

    #[tokio::test]
    async fn test_write_export_creates_dir() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let nested = dir.path().join("exports").join("drafts");

        let path = write_export(&nested, "T", "B").await.unwrap();
        assert!(path.exists());
    }
}
