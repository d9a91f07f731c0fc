use image::GenericImageView;
use indicatif::{ProgressFinish, ProgressIterator};
use std::path::Path;

use crate::curate::CurateArgs;
use crate::dataset::{SampleArgs, load_image_dataset};
use crate::error::{AppError, Result};
use crate::progress_bar::progress_bar_style;
use crate::sheet::{SheetConfigs, render_contact_sheet};
use crate::source::{SampleLoader, collect_images_from_dir};

/// Report the pixel dimensions of a sample of images from each configured
/// folder and render one contact sheet per folder.
///
/// Missing folders are skipped with a diagnostic, like curation does.
/// Sheets are written under `save_dir` when configured; nothing in the
/// dataset tree itself is touched.
pub fn run_inspection(args: &CurateArgs, sheet_cfg: &SheetConfigs) -> Result<()> {
    if let Some(dir) = &sheet_cfg.save_dir {
        std::fs::create_dir_all(dir)?;
    }

    for folder_name in &args.folders {
        let folder_path = args.dataset_dir.join(folder_name);
        if !folder_path.exists() {
            tracing::warn!("Folder does not exist: {:?}", folder_path);
            continue;
        }

        let paths = collect_images_from_dir(&folder_path)
            .map_err(|e| AppError::ImageCollection(format!("{:?}: {}", folder_path, e)))?;
        let sample: Vec<_> = paths.into_iter().take(sheet_cfg.capacity()).collect();

        tracing::info!("Folder: {} ({} images sampled)", folder_name, sample.len());

        let loader = SampleLoader::new(sample);
        let mut tiles = Vec::with_capacity(loader.len());
        for (image, meta) in loader
            .progress_with_style(progress_bar_style())
            .with_message("Inspecting")
            .with_finish(ProgressFinish::WithMessage("Finished".into()))
        {
            let (width, height) = image.dimensions();
            tracing::info!("{}: Size: {} x {} pixels", meta.file_name(), width, height);
            tiles.push((image, format!("Size: {width} x {height}")));
        }

        let sheet = render_contact_sheet(&tiles, sheet_cfg);
        if let Some(dir) = &sheet_cfg.save_dir {
            let save_path = dir.join(format!("{folder_name}.png"));
            if sheet.save(&save_path).is_err() {
                tracing::error!("Failed to save contact sheet to {:?}. skipping.", save_path);
                continue;
            }
            tracing::info!("Contact sheet saved to {:?}", save_path);
        }
    }

    Ok(())
}

/// Render preview sheets for the leading batches of the labeled dataset
/// under `root`, tiles captioned with their class labels.
pub fn run_sample_preview(
    root: &Path,
    args: &SampleArgs,
    sheet_cfg: &SheetConfigs,
) -> Result<()> {
    if let Some(dir) = &sheet_cfg.save_dir {
        std::fs::create_dir_all(dir)?;
    }

    let dataset = load_image_dataset(root, args)?;
    let batches = dataset.batches(args);
    tracing::info!(
        "Previewing {} of {} batches",
        args.preview_batches.min(batches.len()),
        batches.len()
    );

    for (batch_idx, batch) in batches.take(args.preview_batches).enumerate() {
        let tiles: Vec<_> = batch
            .images
            .into_iter()
            .zip(batch.metas.iter())
            .map(|(image, meta)| {
                let label = meta.label.clone().unwrap_or_default();
                (image, format!("Label: {label}"))
            })
            .collect();

        let sheet = render_contact_sheet(&tiles, sheet_cfg);
        if let Some(dir) = &sheet_cfg.save_dir {
            let save_path = dir.join(format!("batch_{batch_idx}.png"));
            if sheet.save(&save_path).is_err() {
                tracing::error!("Failed to save preview sheet to {:?}. skipping.", save_path);
                continue;
            }
            tracing::info!("Preview sheet saved to {:?}", save_path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerRule;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn make_folder(root: &Path, name: &str, count: usize) {
        let dir = root.join(name);
        std::fs::create_dir(&dir).unwrap();
        for i in 0..count {
            RgbImage::from_pixel(5, 5, Rgb([i as u8, 0, 0]))
                .save(dir.join(format!("img_{i}.png")))
                .unwrap();
        }
    }

    #[test]
    fn test_inspection_writes_one_sheet_per_folder() {
        let dataset = TempDir::new().unwrap();
        make_folder(dataset.path(), "cats", 2);
        make_folder(dataset.path(), "dogs", 1);
        let out = TempDir::new().unwrap();

        let args = CurateArgs {
            dataset_dir: dataset.path().to_path_buf(),
            folders: vec!["cats".to_string(), "dogs".to_string()],
            marker: MarkerRule::default(),
            verbose: false,
        };
        let sheet_cfg = SheetConfigs {
            rows: 2,
            cols: 2,
            tile_size: (10, 10),
            save_dir: Some(out.path().to_path_buf()),
            ..Default::default()
        };

        run_inspection(&args, &sheet_cfg).unwrap();

        assert!(out.path().join("cats.png").exists());
        assert!(out.path().join("dogs.png").exists());
    }

    #[test]
    fn test_inspection_skips_missing_folder() {
        let dataset = TempDir::new().unwrap();
        let args = CurateArgs {
            dataset_dir: dataset.path().to_path_buf(),
            folders: vec!["missing".to_string()],
            ..Default::default()
        };

        run_inspection(&args, &SheetConfigs::default()).unwrap();
    }

    #[test]
    fn test_preview_writes_batch_sheets() {
        let dataset = TempDir::new().unwrap();
        make_folder(dataset.path(), "ants", 3);
        make_folder(dataset.path(), "bees", 3);
        let out = TempDir::new().unwrap();

        let args = SampleArgs {
            image_size: (10, 10),
            batch_size: 4,
            validation_split: 0.0,
            seed: Some(11),
            preview_batches: 2,
            ..Default::default()
        };
        let sheet_cfg = SheetConfigs {
            rows: 2,
            cols: 2,
            tile_size: (10, 10),
            save_dir: Some(out.path().to_path_buf()),
            ..Default::default()
        };

        run_sample_preview(dataset.path(), &args, &sheet_cfg).unwrap();

        assert!(out.path().join("batch_0.png").exists());
        assert!(out.path().join("batch_1.png").exists());
    }
}
