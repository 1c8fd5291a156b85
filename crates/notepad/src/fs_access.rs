use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::host::{FileAccess, FileHandle};
use crate::prompt;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;

/// A file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsHandle {
    path: PathBuf,
    name: String,
}

impl FsHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for FsHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> Result<String> {
        let path = &self.path;
        if !path.is_file() {
            return Err(anyhow::anyhow!("Not a file: {}", path.display()));
        }

        match fs::metadata(path).await {
            Ok(metadata) if metadata.len() > LARGE_FILE_THRESHOLD => {
                log::warn!(
                    "Large file detected ({} bytes): {}",
                    metadata.len(),
                    path.display()
                );
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to get file metadata: {}", e),
        }

        match fs::read(path).await {
            // Invalid UTF-8 is replaced rather than rejected
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    anyhow::anyhow!("Permission denied: {}", path.display())
                }
                std::io::ErrorKind::NotFound => {
                    anyhow::anyhow!("File not found: {}", path.display())
                }
                _ => anyhow::anyhow!("Failed to read {}: {}", path.display(), e),
            }),
        }
    }

    async fn write_text(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, content).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                anyhow::anyhow!("Permission denied: {}", self.path.display())
            }
            _ => anyhow::anyhow!("Failed to write {}: {}", self.path.display(), e),
        })
    }
}

/// Read the three playground panes and compose them into one document.
/// A pane without a file is left empty.
pub async fn playground_from_files(
    html: Option<&Path>,
    css: Option<&Path>,
    js: Option<&Path>,
) -> Result<String> {
    async fn pane(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) => FsHandle::new(path).read_text().await,
            None => Ok(String::new()),
        }
    }
    let (html, css, js) = (pane(html).await?, pane(css).await?, pane(js).await?);
    Ok(preview::playground(&html, &css, &js))
}

/// Path pickers backed by stdin. Preset paths skip the prompt once; without
/// a preset, a non-interactive picker behaves like a dismissed dialog.
#[derive(Debug, Default)]
pub struct FsFileAccess {
    interactive: bool,
    next_open: Option<PathBuf>,
    next_save: Option<PathBuf>,
}

impl FsFileAccess {
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Default::default()
        }
    }

    pub fn non_interactive() -> Self {
        Self::default()
    }

    pub fn preset_open(&mut self, path: impl Into<PathBuf>) {
        self.next_open = Some(path.into());
    }

    pub fn preset_save(&mut self, path: impl Into<PathBuf>) {
        self.next_save = Some(path.into());
    }

    async fn ask(&self, label: String) -> Result<Option<FsHandle>> {
        if !self.interactive {
            return Ok(None);
        }
        let answer = tokio::task::spawn_blocking(move || prompt::read_line(&label)).await??;
        Ok(answer
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .map(FsHandle::new))
    }
}

#[async_trait]
impl FileAccess for FsFileAccess {
    type Handle = FsHandle;

    async fn pick_open(&mut self) -> Result<Option<FsHandle>> {
        if let Some(path) = self.next_open.take() {
            return Ok(Some(FsHandle::new(path)));
        }
        self.ask("Open file: ".to_string()).await
    }

    async fn pick_save(&mut self, suggested_name: &str) -> Result<Option<FsHandle>> {
        if let Some(path) = self.next_save.take() {
            return Ok(Some(FsHandle::new(path)));
        }
        self.ask(format!("Save as [{}]: ", suggested_name))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_and_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "a much longer original text").unwrap();

        let handle = FsHandle::new(&path);
        assert_eq!(handle.name(), "notes.md");
        assert_eq!(handle.read_text().await.unwrap(), "a much longer original text");

        handle.write_text("short").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/out.txt");
        FsHandle::new(&path).write_text("x").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }

    #[tokio::test]
    async fn test_read_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let error = FsHandle::new(dir.path().join("gone.txt"))
            .read_text()
            .await
            .unwrap_err();
        assert!(error.to_string().contains("gone.txt"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        std::fs::write(&path, [b'o', b'k', 0xff]).unwrap();
        assert_eq!(FsHandle::new(&path).read_text().await.unwrap(), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn test_playground_from_files() {
        let dir = tempdir().unwrap();
        let html = dir.path().join("index.html");
        let js = dir.path().join("app.js");
        std::fs::write(&html, "<p id=\"out\"></p>").unwrap();
        std::fs::write(&js, "out.textContent = 'hi';").unwrap();

        let doc = playground_from_files(Some(html.as_path()), None, Some(js.as_path()))
            .await
            .unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(!doc.contains("<style>"));
        assert!(doc.contains("<body><p id=\"out\"></p><script>out.textContent = 'hi';</script>"));
    }

    #[tokio::test]
    async fn test_playground_missing_pane_file_fails() {
        let dir = tempdir().unwrap();
        let css = dir.path().join("gone.css");
        let error = playground_from_files(None, Some(css.as_path()), None)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("gone.css"));
    }

    #[tokio::test]
    async fn test_presets_are_used_once() {
        let mut files = FsFileAccess::non_interactive();
        files.preset_save("/tmp/a.txt");
        let picked = files.pick_save("Untitled.txt").await.unwrap().unwrap();
        assert_eq!(picked.path(), Path::new("/tmp/a.txt"));
        assert!(files.pick_save("Untitled.txt").await.unwrap().is_none());
        assert!(files.pick_open().await.unwrap().is_none());
    }
}
