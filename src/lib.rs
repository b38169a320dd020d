//! Segflora - segetal plant species segmentation on UAV imagery.
//!
//! This crate extracts per-species binary masks from image tiles with YOLO
//! segmentation models and scores them against ground truth masks.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod interrupt;
pub mod mask;
pub mod metrics;
pub mod output;
pub mod pipeline;

use clap::Parser;
use cli::{Cli, Command, EvaluateArgs, PredictArgs};
use config::{
    Config, config_file_path, load_config, results_csv_path, save_config, save_default_config,
    select_species, tiles_dir, validate_config,
};
use inference::YoloSegmenter;
use output::{
    EvaluationSummary, MetricsCsvWriter, SummarySettings, write_all, write_summary_json,
};
use pipeline::{
    EvaluateOptions, ExtractOptions, collect_tiles, ensure_dir, evaluate_all, extract_species,
};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the segflora CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);
    interrupt::install_handler();

    if let Command::Config { action } = cli.command {
        return handle_config_command(action, cli.config.as_deref());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(root) = cli.data_root.clone() {
        config.paths.data_root = root;
    }
    let progress_enabled = !cli.quiet && !cli.no_progress;

    match cli.command {
        Command::Predict(args) => {
            apply_predict_overrides(&mut config, &args);
            validate_config(&config)?;
            predict(&config, &args, progress_enabled)
        }
        Command::Evaluate(args) => {
            validate_config(&config)?;
            evaluate(&config, &args, progress_enabled)
        }
        Command::Species => {
            validate_config(&config)?;
            cli::species::list_species(&config)
        }
        Command::Config { .. } => Ok(()),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default; -v shows warnings, -vv info, -vvv everything.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn apply_predict_overrides(config: &mut Config, args: &PredictArgs) {
    if let Some(tiles) = &args.tiles {
        config.paths.tiles_dir = Some(tiles.clone());
    }
    if let Some(confidence) = args.confidence {
        config.inference.confidence = confidence;
    }
    if let Some(imgsz) = args.imgsz {
        config.inference.imgsz = imgsz;
    }
    if args.save_annotated {
        config.extraction.save_annotated = true;
    }
}

/// Stage 1: write species masks for every tile.
fn predict(config: &Config, args: &PredictArgs, progress_enabled: bool) -> Result<()> {
    let total_start = Instant::now();

    let mut species = select_species(config, &args.species)?;
    if let Some(model) = &args.model {
        let [only] = species.as_mut_slice() else {
            return Err(Error::ConfigValidation {
                message: "--model requires exactly one --species".to_string(),
            });
        };
        only.model.clone_from(model);
    }

    let tiles = collect_tiles(&tiles_dir(config))?;
    info!("Found {} tile(s) to process", tiles.len());

    let options = ExtractOptions {
        mask_extension: config.extraction.mask_extension.clone(),
        skip_empty_masks: config.extraction.skip_empty_masks,
        save_annotated: config.extraction.save_annotated,
        fail_fast: args.fail_fast,
        progress: progress_enabled,
    };

    let mut errors = 0;
    for s in &species {
        let result = YoloSegmenter::load(&s.model, &config.inference)
            .and_then(|mut segmenter| extract_species(&mut segmenter, &tiles, s, &options));
        match result {
            Ok(summary) => errors += summary.errors,
            Err(Error::Interrupted) => return Err(Error::Interrupted),
            Err(e) => {
                error!("Failed to process {}: {}", s.name, e);
                errors += 1;
                if args.fail_fast {
                    return Err(e);
                }
            }
        }
    }

    info!(
        "Complete: {} species in {:.2}s",
        species.len(),
        total_start.elapsed().as_secs_f64()
    );
    if errors > 0 {
        warn!("{} error(s) during extraction", errors);
    }
    Ok(())
}

/// Stage 2: score predicted masks and write the result table.
fn evaluate(config: &Config, args: &EvaluateArgs, progress_enabled: bool) -> Result<()> {
    let total_start = Instant::now();
    let species = select_species(config, &args.species)?;

    let options = EvaluateOptions {
        mask_suffix: config.evaluation.mask_suffix.clone(),
        ground_truth_height: config.evaluation.ground_truth_height.clone(),
        ground_truth_extension: config.evaluation.ground_truth_extension.clone(),
        keep_going: args.keep_going,
        progress: progress_enabled,
    };

    let evaluation = evaluate_all(&species, &options)?;

    let csv_path = args
        .output
        .clone()
        .unwrap_or_else(|| results_csv_path(config));
    create_parent(&csv_path)?;
    let include_bom = config.output.csv_bom && !args.no_csv_bom;
    let mut writer = MetricsCsvWriter::new(&csv_path, include_bom)?;
    write_all(&mut writer, &evaluation.records)?;
    info!(
        "Wrote {} record(s) to {}",
        evaluation.records.len(),
        csv_path.display()
    );

    if let Some(summary_path) = args.summary.as_ref().or(config.paths.summary_json.as_ref()) {
        let names: Vec<String> = species.iter().map(|s| s.name.clone()).collect();
        let summary = EvaluationSummary::from_records(
            &evaluation.records,
            &names,
            SummarySettings {
                mask_suffix: options.mask_suffix.clone(),
                ground_truth_height: options.ground_truth_height.clone(),
            },
            evaluation.skipped,
        );
        create_parent(summary_path)?;
        write_summary_json(summary_path, &summary)?;
        info!("Wrote summary to {}", summary_path.display());
    }

    if evaluation.skipped > 0 {
        warn!("{} mask(s) skipped because of errors", evaluation.skipped);
    }
    info!(
        "Complete: {} species in {:.2}s",
        species.len(),
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction, explicit: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = if explicit.is_some() {
                    save_config(&config, &path)?;
                    path
                } else {
                    save_default_config(&config)?
                };
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  Set paths.data_root, then run 'segflora species' to check the layout.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(explicit)?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
