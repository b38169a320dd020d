//! Processing pipeline components.

mod coordinator;
mod evaluate;
mod extract;
mod naming;

pub use coordinator::{collect_mask_files, collect_tiles, ensure_dir};
pub use evaluate::{EvaluateOptions, Evaluation, evaluate_all, evaluate_mask, evaluate_species};
pub use extract::{
    ExtractOptions, ExtractionSummary, TileOutcome, annotate, extract_species, process_tile,
};
pub use naming::{MaskName, ground_truth_path, mask_output_path, mask_suffix, parse_mask_name};
