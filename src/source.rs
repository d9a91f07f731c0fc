// -- submodules
mod loader;
mod source_utils;

pub use loader::SampleLoader;
pub use source_utils::{collect_images_from_dir, is_image_file, list_class_dirs};

// -- external imports
use std::path::PathBuf;

/// Metadata accompanying one decoded sample.
#[derive(Debug, Clone)]
pub struct SampleMeta {
    /// Current sample index (0-based).
    pub sample_idx: usize,
    /// Total samples in the originating set.
    pub total_samples: usize,
    /// Path the sample was decoded from.
    pub source_path: PathBuf,
    /// Class name, when the sample came from a labeled dataset.
    pub label: Option<String>,
}

impl SampleMeta {
    pub fn file_stem(&self) -> String {
        self.source_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}
