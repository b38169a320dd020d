//! End-to-end tests for the evaluate command.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use segflora::mask::BinaryMask;
use std::path::Path;
use tempfile::TempDir;

fn quadrant(size: u32) -> BinaryMask {
    let mut mask = BinaryMask::new(size, size);
    for y in 0..size / 2 {
        for x in 0..size / 2 {
            mask.set(x, y, true);
        }
    }
    mask
}

/// Lay out predictions and ground truth for `key` below `root`.
fn write_species(root: &Path, key: &str, plots: &[(u32, BinaryMask, Option<BinaryMask>)]) {
    let predictions = root.join("predictions").join(key);
    let ground_truth = root.join("test_plots/masks").join(key);
    std::fs::create_dir_all(&predictions).unwrap();
    std::fs::create_dir_all(&ground_truth).unwrap();
    for (plot, predicted, truth) in plots {
        predicted
            .save(&predictions.join(format!("{key}_plot_{plot}_flight_X30.png.tiff")))
            .unwrap();
        if let Some(truth) = truth {
            truth
                .save(&ground_truth.join(format!("plot_{plot}_flight_X10.tiff")))
                .unwrap();
        }
    }
}

fn segflora(root: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("segflora");
    cmd.env_remove("SEGFLORA_RESULTS_CSV")
        .arg("--config")
        .arg(root.join("config.toml"))
        .arg("--data-root")
        .arg(root)
        .arg("--no-progress");
    cmd
}

#[test]
fn test_evaluate_writes_result_table() {
    let dir = TempDir::new().unwrap();
    write_species(
        dir.path(),
        "Papaver",
        &[
            (12, quadrant(8), Some(quadrant(8))),
            (3, BinaryMask::new(8, 8), Some(quadrant(8))),
        ],
    );
    write_species(dir.path(), "Vicia", &[(5, quadrant(8), Some(quadrant(8)))]);

    segflora(dir.path())
        .args(["evaluate", "--species", "Vicia,Papaver"])
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("YOLO_segmentation_accuracy.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], ",IoU,precision,recall,plot,species,height");
    // Configuration order: Vicia before Papaver dubium; indices restart per species
    // and masks are visited in file name order.
    assert_eq!(lines[1], "0,1.0,1.0,1.0,Vicia_plot_5_flight_X30.png.tiff,Vicia,30");
    assert_eq!(lines[2], "0,1.0,1.0,1.0,Papaver_plot_12_flight_X30.png.tiff,Papaver dubium,30");
    assert_eq!(lines[3], "1,0.375,0.0,0.0,Papaver_plot_3_flight_X30.png.tiff,Papaver dubium,30");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_evaluate_missing_ground_truth_fails() {
    let dir = TempDir::new().unwrap();
    write_species(dir.path(), "Vicia", &[(1, quadrant(4), None)]);

    segflora(dir.path())
        .args(["evaluate", "-s", "Vicia"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ground truth mask not found"));

    assert!(!dir.path().join("YOLO_segmentation_accuracy.csv").exists());
}

#[test]
fn test_evaluate_keep_going_and_summary() {
    let dir = TempDir::new().unwrap();
    write_species(
        dir.path(),
        "Vicia",
        &[(1, quadrant(4), None), (2, quadrant(4), Some(quadrant(4)))],
    );
    let output = dir.path().join("out").join("results.csv");
    let summary = dir.path().join("summary.json");

    segflora(dir.path())
        .args(["evaluate", "-s", "Vicia", "--keep-going", "--output"])
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 2);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["skipped"], 1);
    assert_eq!(json["total_masks"], 1);
    assert_eq!(json["species"][0]["species"], "Vicia");
    assert_eq!(json["species"][0]["mean_iou"], 1.0);
}

#[test]
fn test_evaluate_missing_predictions_dir_fails() {
    let dir = TempDir::new().unwrap();

    segflora(dir.path())
        .args(["evaluate", "-s", "Anchusa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("predictions directory does not exist"));
}

#[test]
fn test_evaluate_unknown_species_fails() {
    let dir = TempDir::new().unwrap();

    segflora(dir.path())
        .args(["evaluate", "-s", "Quercus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("species 'Quercus' not found"));
}
