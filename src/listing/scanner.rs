//! Output directory scanning.
//!
//! # Responsibilities
//! - Enumerate the pipeline's output directory on every call
//! - Filter to supported image extensions, case-insensitively
//! - Sort newest-first by filesystem mtime
//!
//! # Design Decisions
//! - A missing directory is created and listed as empty, not an error
//! - The pipeline writes concurrently: a stat failure on a single entry
//!   skips that entry instead of failing the scan
//! - Scan cost is proportional to directory size on every request; accepted
//!   for the directory sizes a single workspace produces

use serde::Serialize;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// File extensions included in listings, compared case-insensitively.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// A generated image present in the output directory at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// Filename, unique within one scan.
    pub name: String,
    /// Public URL path the file is served under.
    pub url: String,
    /// Last-modified time in milliseconds since the Unix epoch.
    pub time: u64,
    /// File size in bytes.
    pub size: u64,
}

/// Scan `dir` for generated images, newest first.
///
/// When the directory does not exist yet it is created (recursively) and an
/// empty list is returned; the pipeline simply has not produced anything.
/// Each entry's `url` joins `public_prefix` with the filename.
pub async fn scan_output_dir(dir: &Path, public_prefix: &str) -> io::Result<Vec<ImageEntry>> {
    if tokio::fs::metadata(dir).await.is_err() {
        tracing::info!(dir = %dir.display(), "Output directory missing, creating");
        tokio::fs::create_dir_all(dir).await?;
        return Ok(Vec::new());
    }

    let prefix = public_prefix.trim_end_matches('/');
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            // Non-UTF-8 names cannot be addressed by URL.
            Err(_) => continue,
        };
        if !has_image_extension(&name) {
            continue;
        }

        // A file the pipeline deleted between readdir and stat is dropped
        // from this scan; the next scan will not see it either.
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(file = %name, error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let time = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let url = format!("{}/{}", prefix, name);
        entries.push(ImageEntry {
            name,
            url,
            time,
            size: metadata.len(),
        });
    }

    // Newest first; ties keep enumeration order.
    entries.sort_by(|a, b| b.time.cmp(&a.time));

    tracing::debug!(
        dir = %dir.display(),
        count = entries.len(),
        "Scanned output directory"
    );

    Ok(entries)
}

fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::fs;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_image_extension("a.png"));
        assert!(has_image_extension("b.JPG"));
        assert!(has_image_extension("c.WebP"));
        assert!(has_image_extension("archive.tar.jpeg"));
        assert!(!has_image_extension("notes.txt"));
        assert!(!has_image_extension("clip.mp4"));
        assert!(!has_image_extension("png"));
        assert!(!has_image_extension("trailing.jpg.bak"));
    }

    #[tokio::test]
    async fn missing_directory_is_created_and_empty() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("not-yet");

        let entries = scan_output_dir(&dir, "/output").await.unwrap();
        assert!(entries.is_empty());
        assert!(dir.is_dir());

        // Idempotent: an immediate second call behaves the same.
        let entries = scan_output_dir(&dir, "/output").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn entries_are_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for (name, secs) in [("old.png", 1_000), ("new.jpg", 3_000), ("mid.gif", 2_000)] {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
        }

        let entries = scan_output_dir(dir.path(), "/output").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["new.jpg", "mid.gif", "old.png"]);
        assert_eq!(entries[0].time, 3_000_000);
    }

    #[tokio::test]
    async fn unsupported_files_and_subdirectories_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.webp"), b"img").unwrap();
        fs::write(dir.path().join("skip.txt"), b"txt").unwrap();
        fs::write(dir.path().join("skip.mp4"), b"vid").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let entries = scan_output_dir(dir.path(), "/output").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "keep.webp");
        assert_eq!(entries[0].size, 3);
    }

    #[tokio::test]
    async fn url_joins_public_prefix_and_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shot.jpeg"), b"img").unwrap();

        let entries = scan_output_dir(dir.path(), "/output/").await.unwrap();
        assert_eq!(entries[0].url, "/output/shot.jpeg");
    }
}
