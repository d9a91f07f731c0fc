use image::DynamicImage;
use std::iter::ExactSizeIterator;
use std::path::PathBuf;

use super::SampleMeta;

/// Lazily decodes a fixed list of image paths.
///
/// Entries that fail to decode are logged and skipped rather than aborting
/// the iteration.
#[derive(Debug)]
pub struct SampleLoader {
    current_idx: usize,
    samples: Vec<(PathBuf, Option<String>)>,
    len: usize,
}

impl SampleLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let samples = paths.into_iter().map(|path| (path, None)).collect();
        Self::with_labels(samples)
    }

    pub fn with_labels(samples: Vec<(PathBuf, Option<String>)>) -> Self {
        let len = samples.len();
        Self {
            current_idx: 0,
            samples,
            len,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Iterator for SampleLoader {
    type Item = (DynamicImage, SampleMeta);

    /// Get the next decoded sample and its metadata (in lazy loading manner)
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_idx >= self.len {
            return None;
        }

        let (path, label) = &self.samples[self.current_idx];
        let image = match image::open(path) {
            Ok(img) => img,
            Err(e) => {
                tracing::error!("Failed to open image: {:?}. Error: {}", path, e);
                self.current_idx += 1;
                return self.next();
            }
        };

        let meta = SampleMeta {
            sample_idx: self.current_idx,
            total_samples: self.len,
            source_path: path.clone(),
            label: label.clone(),
        };

        self.current_idx += 1;
        Some((image, meta))
    }
}

/// Implement ExactSizeIterator (to use indicatif's ProgressIterator)
impl ExactSizeIterator for SampleLoader {
    fn len(&self) -> usize {
        self.len
    }
}
