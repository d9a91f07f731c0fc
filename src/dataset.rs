// -- imports
use image::DynamicImage;
use image::imageops::FilterType;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::error::{AppError, Result};
use crate::source::{SampleMeta, collect_images_from_dir, list_class_dirs};

// -- enums

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize, VariantNames)]
#[strum(ascii_case_insensitive)]
#[serde(untagged)]
/// Dataset subset to load
pub enum Subset {
    Training,
    Validation,
}

impl Default for Subset {
    fn default() -> Self {
        Subset::Training
    }
}

/// Custom deserializer with helpful error message
pub fn deserialize_subset<'de, D>(deserializer: D) -> Result<Subset, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Subset::from_str(&value).map_err(|_| {
        let variants = Subset::VARIANTS;
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", variants.join(", ")).as_str(),
        )
    })
}

// -- structs

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleArgs {
    /// Target (width, height) every sample is resized to
    pub image_size: (u32, u32),

    /// Number of samples per batch
    pub batch_size: usize,

    /// Fraction of samples reserved for the validation subset
    pub validation_split: f32,

    /// Subset to load
    #[serde(deserialize_with = "deserialize_subset")]
    pub subset: Subset,

    /// Seed for the shuffle; drawn from OS entropy when absent
    pub seed: Option<u64>,

    /// Number of batches rendered by the sample preview
    pub preview_batches: usize,
}

impl Default for SampleArgs {
    fn default() -> Self {
        Self {
            image_size: (100, 100),
            batch_size: 10,
            validation_split: 0.2,
            subset: Subset::default(),
            seed: None,
            preview_batches: 1,
        }
    }
}

/// One subset of a labeled image dataset.
///
/// Produced by [`load_image_dataset`]; samples stay on disk until a
/// [`BatchLoader`] decodes them.
#[derive(Debug)]
pub struct LabeledDataset {
    /// Sorted class names; a sample's class index points into this list.
    pub classes: Vec<String>,
    /// (path, class index) pairs, in post-shuffle order.
    pub samples: Vec<(PathBuf, usize)>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn class_name(&self, class_idx: usize) -> &str {
        self.classes
            .get(class_idx)
            .map_or("class", String::as_str)
    }

    /// Lazy batches of decoded, resized samples.
    pub fn batches(&self, args: &SampleArgs) -> BatchLoader {
        BatchLoader::new(self, args)
    }
}

/// Batch of decoded samples with parallel class indices.
#[derive(Debug)]
pub struct Batch {
    pub images: Vec<DynamicImage>,
    pub labels: Vec<usize>,
    pub metas: Vec<SampleMeta>,
}

// -- public API

/// Load a labeled image dataset from a directory of class subfolders.
///
/// Every immediate subdirectory of `root` is one class (sorted name order
/// fixes the class index). Samples are shuffled, split off into the
/// validation fraction, and the subset requested in `args` is returned.
/// The same seed always yields the same order and split.
///
/// # Errors
///
/// Returns `AppError::Config` for a split outside `[0, 1)` and
/// `AppError::ImageCollection` when `root` has no class folders or a
/// folder cannot be listed.
pub fn load_image_dataset(root: &Path, args: &SampleArgs) -> Result<LabeledDataset> {
    if !(0.0..1.0).contains(&args.validation_split) {
        return Err(AppError::Config(format!(
            "validation_split must be in [0, 1), got {}",
            args.validation_split
        )));
    }

    let class_dirs = list_class_dirs(root)
        .map_err(|e| AppError::ImageCollection(format!("{:?}: {}", root, e)))?;
    if class_dirs.is_empty() {
        return Err(AppError::ImageCollection(format!(
            "No class folders found under {:?}",
            root
        )));
    }

    let classes: Vec<String> = class_dirs.iter().map(|(name, _)| name.clone()).collect();

    let mut samples = vec![];
    for (class_idx, (_, dir)) in class_dirs.iter().enumerate() {
        let files = collect_images_from_dir(dir)
            .map_err(|e| AppError::ImageCollection(format!("{:?}: {}", dir, e)))?;
        samples.extend(files.into_iter().map(|path| (path, class_idx)));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    samples.shuffle(&mut rng);

    let n_val = (samples.len() as f32 * args.validation_split).round() as usize;
    let split_at = samples.len() - n_val;
    let samples = match args.subset {
        Subset::Training => samples[..split_at].to_vec(),
        Subset::Validation => samples[split_at..].to_vec(),
    };

    tracing::info!(
        "Loaded {} '{}' samples across {} classes from {:?}",
        samples.len(),
        args.subset,
        classes.len(),
        root
    );

    Ok(LabeledDataset { classes, samples })
}

/// Lazily decodes one chunk of samples per iteration.
#[derive(Debug)]
pub struct BatchLoader {
    current_idx: usize,
    batches: Vec<Vec<(PathBuf, usize)>>,
    len: usize,
    batch_size: usize,
    total_samples: usize,
    classes: Vec<String>,
    image_size: (u32, u32),
}

impl BatchLoader {
    fn new(dataset: &LabeledDataset, args: &SampleArgs) -> Self {
        let batch_size = args.batch_size.max(1);
        let batches: Vec<Vec<(PathBuf, usize)>> = dataset
            .samples
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        let len = batches.len();

        Self {
            current_idx: 0,
            batches,
            len,
            batch_size,
            total_samples: dataset.samples.len(),
            classes: dataset.classes.clone(),
            image_size: args.image_size,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn total_samples(&self) -> usize {
        self.total_samples
    }
}

impl Iterator for BatchLoader {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_idx >= self.len {
            return None;
        }

        let chunk = &self.batches[self.current_idx];
        let (width, height) = self.image_size;
        let mut images = Vec::with_capacity(chunk.len());
        let mut labels = Vec::with_capacity(chunk.len());
        let mut metas = Vec::with_capacity(chunk.len());

        for (i, (path, class_idx)) in chunk.iter().enumerate() {
            let image = match image::open(path) {
                Ok(img) => img.resize_exact(width, height, FilterType::Triangle),
                Err(e) => {
                    tracing::error!("Failed to open image {:?}: {}", path, e);
                    continue;
                }
            };

            let meta = SampleMeta {
                sample_idx: self.current_idx * self.batch_size + i,
                total_samples: self.total_samples,
                source_path: path.clone(),
                label: Some(
                    self.classes
                        .get(*class_idx)
                        .map_or("class", String::as_str)
                        .to_string(),
                ),
            };
            images.push(image);
            labels.push(*class_idx);
            metas.push(meta);
        }

        self.current_idx += 1;
        Some(Batch {
            images,
            labels,
            metas,
        })
    }
}

/// Implement ExactSizeIterator (to use indicatif's ProgressIterator)
impl ExactSizeIterator for BatchLoader {
    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use tempfile::TempDir;

    fn make_dataset_tree(per_class: usize) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for class in ["ants", "bees"] {
            let dir = temp_dir.path().join(class);
            std::fs::create_dir(&dir).unwrap();
            for i in 0..per_class {
                RgbImage::from_pixel(6, 4, Rgb([i as u8, 0, 0]))
                    .save(dir.join(format!("img_{i}.png")))
                    .unwrap();
            }
        }
        temp_dir
    }

    #[test]
    fn test_classes_are_sorted() {
        let tree = make_dataset_tree(1);
        let args = SampleArgs {
            validation_split: 0.0,
            seed: Some(1),
            ..Default::default()
        };

        let dataset = load_image_dataset(tree.path(), &args).unwrap();
        assert_eq!(dataset.classes, ["ants", "bees"]);
    }

    #[test]
    fn test_split_sizes() {
        let tree = make_dataset_tree(5);

        let training = load_image_dataset(
            tree.path(),
            &SampleArgs {
                seed: Some(7),
                ..Default::default()
            },
        )
        .unwrap();
        let validation = load_image_dataset(
            tree.path(),
            &SampleArgs {
                seed: Some(7),
                subset: Subset::Validation,
                ..Default::default()
            },
        )
        .unwrap();

        // 10 samples at a 0.2 split
        assert_eq!(training.len(), 8);
        assert_eq!(validation.len(), 2);
    }

    #[test]
    fn test_same_seed_same_split() {
        let tree = make_dataset_tree(5);
        let args = SampleArgs {
            seed: Some(42),
            ..Default::default()
        };

        let first = load_image_dataset(tree.path(), &args).unwrap();
        let second = load_image_dataset(tree.path(), &args).unwrap();
        assert_eq!(first.samples, second.samples);
    }

    #[test]
    fn test_batches_are_chunked_and_resized() {
        let tree = make_dataset_tree(5);
        let args = SampleArgs {
            image_size: (8, 9),
            batch_size: 4,
            validation_split: 0.0,
            seed: Some(3),
            ..Default::default()
        };

        let dataset = load_image_dataset(tree.path(), &args).unwrap();
        let batches: Vec<_> = dataset.batches(&args).collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].images.len(), 4);
        assert_eq!(batches[2].images.len(), 2);
        assert_eq!(batches[0].images[0].dimensions(), (8, 9));
        assert_eq!(batches[0].labels.len(), batches[0].metas.len());
    }

    #[test]
    fn test_invalid_split_rejected() {
        let tree = make_dataset_tree(1);
        let args = SampleArgs {
            validation_split: 1.0,
            ..Default::default()
        };

        assert!(load_image_dataset(tree.path(), &args).is_err());
    }

    #[test]
    fn test_no_class_folders_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_image_dataset(temp_dir.path(), &SampleArgs::default()).is_err());
    }

    #[test]
    fn test_subset_parses_case_insensitively() {
        assert_eq!(Subset::from_str("training").unwrap(), Subset::Training);
        assert_eq!(Subset::from_str("Validation").unwrap(), Subset::Validation);
        assert!(Subset::from_str("test").is_err());
    }
}
