use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::marker::{MarkerRule, peek_header};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurateArgs {
    /// Base directory containing the class folders
    pub dataset_dir: PathBuf,

    /// Folder names to scan inside `dataset_dir`
    pub folders: Vec<String>,

    /// Header byte sequence a file must carry to be retained
    pub marker: MarkerRule,

    /// Show verbose output
    pub verbose: bool,
}

impl Default for CurateArgs {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::new(),
            folders: Vec::new(),
            marker: MarkerRule::default(),
            verbose: false,
        }
    }
}

/// Delete every file in the given folders whose leading bytes do not
/// contain `marker`.
///
/// Each folder is resolved against `dataset_dir` and scanned independently,
/// without descending into subdirectories. Folders that do not exist are
/// skipped with a diagnostic, as are entries that cannot be opened or read;
/// a skipped entry is neither deleted nor counted. Deletion is permanent,
/// with no trash or dry-run.
///
/// Returns the total number of deleted files.
///
/// # Errors
///
/// Returns `AppError::Deletion` if the filesystem refuses a remove; the
/// variant carries the count of files already deleted before the failure.
pub fn curate_folders(
    dataset_dir: &Path,
    folders: &[String],
    marker: &MarkerRule,
) -> Result<usize> {
    let mut deleted = 0usize;

    for folder_name in folders {
        let folder_path = dataset_dir.join(folder_name);
        if !folder_path.exists() {
            tracing::warn!("Folder does not exist: {:?}", folder_path);
            continue;
        }

        curate_one_folder(&folder_path, marker, &mut deleted)?;
    }

    Ok(deleted)
}

/// Scan one existing folder, purging marker-less entries into `deleted`.
fn curate_one_folder(folder: &Path, marker: &MarkerRule, deleted: &mut usize) -> Result<()> {
    for entry in fs::read_dir(folder)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Could not read entry in {:?}: {}", folder, e);
                continue;
            }
        };
        let path = entry.path();

        // Every directory entry gets a peek attempt; subdirectories and
        // broken links fail here and take the skip path.
        let header = match peek_header(&path) {
            Ok(header) => header,
            Err(e) => {
                tracing::error!("Could not open {:?}: {}", path, e);
                continue;
            }
        };

        if marker.matches(&header) {
            continue;
        }

        fs::remove_file(&path).map_err(|source| AppError::Deletion {
            path: path.clone(),
            deleted: *deleted,
            source,
        })?;
        *deleted += 1;
        tracing::debug!("Deleted: {:?}", path);
    }

    Ok(())
}

/// Core curation API: purge files failing the marker check from the
/// configured folders.
///
/// Returns the number of deleted files.
pub fn run_curation(args: &CurateArgs) -> Result<usize> {
    let start_time = Instant::now();

    tracing::info!("Running dataset curation...");
    tracing::info!("[Dataset]: {:?}", args.dataset_dir);
    if args.verbose {
        tracing::info!("[Folders]: {:?}", args.folders);
        tracing::info!("[Marker]: {:?}", args.marker.as_bytes());
    }

    let deleted = curate_folders(&args.dataset_dir, &args.folders, &args.marker)?;

    let duration = start_time.elapsed();
    tracing::info!("Deleted {} files in {:.3?}", deleted, duration);

    Ok(deleted)
}
