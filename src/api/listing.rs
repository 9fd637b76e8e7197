// Downloads directory listing
// Scanned on every request; nothing is cached

use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

use super::types::FileEntry;

/// List regular files in `dir`, sorted by name
///
/// A missing directory (or a path that is not a directory) lists as empty.
/// Entries that vanish or cannot be stat'ed mid-scan are skipped.
pub async fn list_files(dir: &Path, url_prefix: &str) -> io::Result<Vec<FileEntry>> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Ok(Vec::new()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    }

    let prefix = url_prefix.trim_end_matches('/');
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        // follows symlinks, like a plain stat
        let Ok(meta) = fs::metadata(entry.path()).await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let modified: DateTime<Local> = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH).into();
        entries.push(FileEntry {
            download_url: format!("{prefix}/{name}"),
            name,
            size: meta.len(),
            modified: modified.to_rfc3339(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_files(&dir.path().join("downloads"), "/downloads/")
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_only_regular_files_listed() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("b.apk"), vec![1u8; 10]).unwrap();
        stdfs::write(dir.path().join("a.zip"), vec![2u8; 3]).unwrap();
        stdfs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path(), "/downloads/").await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.zip", "b.apk"]);
        assert_eq!(files[0].size, 3);
        assert_eq!(files[1].download_url, "/downloads/b.apk");
        assert!(DateTime::parse_from_rfc3339(&files[1].modified).is_ok());
    }

    #[tokio::test]
    async fn test_prefix_without_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("demo.apk"), b"x").unwrap();
        let files = list_files(dir.path(), "/files").await.unwrap();
        assert_eq!(files[0].download_url, "/files/demo.apk");
    }

    #[tokio::test]
    async fn test_file_path_lists_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        stdfs::write(&file, b"x").unwrap();
        assert!(list_files(&file, "/downloads/").await.unwrap().is_empty());
    }
}
