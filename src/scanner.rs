use crate::error::ScanError;
use crate::prober::{DurationProbe, is_video_file, probe_minutes};
use crate::types::VideoRecord;
use log::{info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Walk `root` top-down and probe every video file in directories at
/// depth >= `min_depth`. Directories matching an entry of `excluded` are
/// pruned along with everything below them.
pub fn collect_records(
    root: &Path,
    excluded: &[String],
    min_depth: usize,
    probe: &dyn DurationProbe,
) -> Result<Vec<VideoRecord>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }

    let root_abs = absolute_path(root)?;
    let excluded: Vec<PathBuf> = excluded
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| absolute_path(Path::new(p)))
        .collect::<Result<_, _>>()?;

    let walker = WalkDir::new(&root_abs)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() && excluded.iter().any(|ex| ex == e.path()) {
                info!("Skipping excluded directory {}", e.path().display());
                return false;
            }
            true
        });

    let mut records = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Cannot read directory entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_dir() || entry.depth() < min_depth {
            continue;
        }

        let folder = folder_label(&root_abs, entry.path());
        for file in list_videos(entry.path()) {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let duration = probe_minutes(probe, &file);
            records.push(VideoRecord {
                folder: folder.clone(),
                file_name,
                duration,
            });
        }
    }

    Ok(records)
}

/// Non-directory entries directly inside `dir` with a video name, sorted.
///
/// Broken links and other non-regular entries are kept so that a failed
/// probe shows up as a missing duration instead of vanishing.
fn list_videos(dir: &Path) -> Vec<PathBuf> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) => {
            warn!("Cannot list {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut videos = Vec::new();
    for entry in read {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Cannot read entry in {}: {e}", dir.display());
                continue;
            }
        };

        if !is_video_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        let is_dir = match entry.file_type() {
            // Links to directories are not video files
            Ok(ft) => ft.is_dir() || (ft.is_symlink() && path.is_dir()),
            Err(e) => {
                warn!("Cannot stat {}: {e}", path.display());
                false
            }
        };
        if !is_dir {
            videos.push(path);
        }
    }
    videos.sort();
    videos
}

/// Path of `dir` relative to `root` with `/` separators; `"."` for the root.
fn folder_label(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
pub fn absolute_path(path: &Path) -> Result<PathBuf, ScanError> {
    let abs = std::path::absolute(path).map_err(|source| ScanError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}
