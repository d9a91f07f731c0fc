mod curate;
mod dataset;
mod error;
mod inspect;
mod logging;
mod marker;
mod progress_bar;
mod sheet;
mod source;
mod toml_utils;

pub use dataset::{Batch, BatchLoader, LabeledDataset, SampleArgs, Subset, load_image_dataset};
pub use error::{AppError, Result};
pub use inspect::{run_inspection, run_sample_preview};
pub use logging::init_logger;
pub use marker::{HEADER_PEEK_LEN, MarkerRule, peek_header};
pub use progress_bar::progress_bar_style;
pub use sheet::{SheetConfigs, load_font, render_contact_sheet};
pub use source::{SampleLoader, SampleMeta, collect_images_from_dir, is_image_file, list_class_dirs};
pub use toml_utils::{CuratorConfig, parse_toml};

// Core curation operation
pub use curate::{CurateArgs, curate_folders, run_curation};
