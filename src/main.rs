/// An example of running dataset curation based on TOML config files.
use std::path::PathBuf;

use dataset_curator::{init_logger, parse_toml, run_curation, run_inspection, run_sample_preview};

#[allow(dead_code)]
enum Experiment {
    CurateOnly,
    CurateAndInspect,
    SamplePreview,
}

fn main() {
    init_logger();

    let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_dir = project_root.join("assets/configs/");

    let experiment = Experiment::CurateOnly;
    let config_toml = match experiment {
        Experiment::CurateOnly => config_dir.join("curate-only.toml"),
        Experiment::CurateAndInspect => config_dir.join("curate-and-inspect.toml"),
        Experiment::SamplePreview => config_dir.join("sample-preview.toml"),
    };

    let config = parse_toml(&config_toml, &project_root).expect("Failed to parse TOML config");

    dbg!(&config.curate);

    let deleted = run_curation(&config.curate).expect("Failed to run curation");
    tracing::info!("Total deleted files: {}", deleted);

    match experiment {
        Experiment::CurateOnly => {}
        Experiment::CurateAndInspect => {
            run_inspection(&config.curate, &config.sheet).expect("Failed to run inspection");
        }
        Experiment::SamplePreview => {
            run_sample_preview(&config.curate.dataset_dir, &config.sample, &config.sheet)
                .expect("Failed to run sample preview");
        }
    }
}
