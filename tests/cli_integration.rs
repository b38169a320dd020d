//! Integration tests for the species, config and predict commands.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_species_lists_defaults_in_order() {
    let dir = TempDir::new().unwrap();
    let output = cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--data-root")
        .arg(dir.path())
        .arg("species")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured species (7):"))
        .stdout(predicate::str::contains("(missing)"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let centaurea = stdout.find("Centaurea cyanus").unwrap();
    let anchusa = stdout.find("Anchusa arvensis").unwrap();
    assert!(centaurea < anchusa);
}

#[test]
fn test_config_init_show_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[species]]"))
        .stdout(predicate::str::contains("Tripleurospermum inodorum"));

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[inference]\nimgsz = 850\n").unwrap();

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(&path)
        .arg("species")
        .assert()
        .failure()
        .stderr(predicate::str::contains("imgsz"));
}

#[test]
fn test_predict_missing_tiles_dir_fails() {
    let dir = TempDir::new().unwrap();

    cargo_bin_cmd!("segflora")
        .env_remove("SEGFLORA_TILES_DIR")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--data-root")
        .arg(dir.path())
        .args(["predict", "-s", "Vicia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tile directory does not exist"));
}

#[test]
fn test_predict_missing_model_with_fail_fast() {
    let dir = TempDir::new().unwrap();
    let tiles = dir.path().join("tiles");
    std::fs::create_dir_all(&tiles).unwrap();
    image::RgbImage::new(4, 4)
        .save(tiles.join("plot_1_flight_X10.png"))
        .unwrap();

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--data-root")
        .arg(dir.path())
        .args(["predict", "-s", "Vicia", "--fail-fast", "--tiles"])
        .arg(&tiles)
        .assert()
        .failure()
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_predict_model_override_needs_single_species() {
    let dir = TempDir::new().unwrap();
    let tiles = dir.path().join("tiles");
    std::fs::create_dir_all(&tiles).unwrap();

    cargo_bin_cmd!("segflora")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--data-root")
        .arg(dir.path())
        .args(["predict", "-s", "Vicia,Papaver", "--model", "m.onnx", "--tiles"])
        .arg(&tiles)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--model requires exactly one --species"));
}
