//! Species listing.

#![allow(clippy::print_stdout)]

use crate::config::{Config, Species, select_species};
use crate::error::Result;
use std::path::Path;

/// Print every configured species with its resolved paths.
pub fn list_species(config: &Config) -> Result<()> {
    let species = select_species(config, &[])?;

    println!("Configured species ({}):", species.len());
    for s in &species {
        print_species(s);
    }
    Ok(())
}

fn print_species(species: &Species) {
    println!();
    println!("  {} [{}] class {}", species.name, species.key, species.class_index);
    println!("    model:        {}", describe(&species.model));
    println!("    predictions:  {}", describe(&species.predictions_dir));
    println!("    ground truth: {}", describe(&species.ground_truth_dir));
}

/// Path followed by a marker when it does not exist yet.
fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}
