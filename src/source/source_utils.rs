use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn is_image_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(
            ext.as_str(),
            "jpg" | "jpeg" | "jfif" | "png" | "bmp" | "gif" | "webp" | "tiff" | "tif"
        )
    })
}

/// Non-recursive listing of the image files inside `dir`, sorted by name.
pub fn collect_images_from_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut image_paths = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            image_paths.push(path);
        }
    }
    image_paths.sort();
    Ok(image_paths)
}

/// Immediate subdirectories of `root`, sorted by name.
///
/// The sorted position doubles as the class index of a labeled dataset.
pub fn list_class_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut classes = vec![];
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            classes.push((name, path));
        }
    }
    classes.sort();
    Ok(classes)
}
