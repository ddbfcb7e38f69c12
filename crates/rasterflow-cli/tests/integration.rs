//! Integration tests for rasterflow-cli.
//!
//! Tests run the built `rasterflow` binary against temporary files and check
//! its output and the images it writes.

use std::path::Path;
use std::process::{Command, Output};

use rasterflow_core::{ImageFormat, PixelBuffer};
use tempfile::TempDir;

/// Helper to get the path to the `rasterflow` binary built by cargo.
fn rasterflow_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rasterflow"));
    // Keep the user's real config out of the tests.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("rasterflow-cli-tests"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run rasterflow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("input.png");
    rasterflow_io::save(&path, &PixelBuffer::filled(6, 4, [100, 100, 100]), ImageFormat::Png, 50)
        .unwrap();
    path
}

// ---------------------------------------------------------------------------
// `rasterflow operators`
// ---------------------------------------------------------------------------

#[test]
fn operators_lists_every_kind() {
    let output = run(rasterflow_bin().arg("operators"));
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Available Operators"));
    for id in ["source", "sink", "brightness_contrast", "blur"] {
        assert!(text.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn operators_details_show_parameters() {
    let output = run(rasterflow_bin().args(["operators", "blur"]));
    assert!(output.status.success());

    let text = stdout(&output);
    for id in ["radius", "mode", "angle", "amount", "Uniform / Directional"] {
        assert!(text.contains(id), "details should contain '{id}'");
    }
}

#[test]
fn operators_rejects_unknown_name() {
    let output = run(rasterflow_bin().args(["operators", "sharpen"]));
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `rasterflow kernel`
// ---------------------------------------------------------------------------

#[test]
fn kernel_table_has_three_decimals() {
    let output = run(rasterflow_bin().args(["kernel", "--radius", "1", "--mode", "directional"]));
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("0.333 0.333 0.333"), "got:\n{text}");
}

#[test]
fn kernel_json_is_normalized() {
    let output = run(rasterflow_bin().args(["kernel", "--radius", "3", "--json"]));
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["size"], 7);
    let sum: f64 = json["rows"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap().iter())
        .map(|w| w.as_f64().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-4, "sum = {sum}");
}

#[test]
fn kernel_rejects_out_of_range_radius() {
    let output = run(rasterflow_bin().args(["kernel", "--radius", "21"]));
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `rasterflow process`
// ---------------------------------------------------------------------------

#[test]
fn process_applies_chain() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out.png");

    let output = run(rasterflow_bin()
        .arg("process")
        .arg(&input)
        .arg(&out)
        .args(["--chain", "bc:brightness=20,contrast=1.5|blur:radius=2"]));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // 100 * 1.5 + 20 = 170, and a flat image stays flat through the blur.
    let result = rasterflow_io::load(&out).unwrap();
    assert_eq!(result, PixelBuffer::filled(6, 4, [170, 170, 170]));
}

#[test]
fn process_without_chain_copies() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("copy.png");

    let output = run(rasterflow_bin().arg("process").arg(&input).arg(&out));
    assert!(output.status.success());
    assert_eq!(
        rasterflow_io::load(&out).unwrap(),
        rasterflow_io::load(&input).unwrap()
    );
}

#[test]
fn process_format_flag_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out.png");

    let output = run(rasterflow_bin()
        .arg("process")
        .arg(&input)
        .arg(&out)
        .args(["--format", "jpeg", "--quality", "80"]));
    assert!(output.status.success());

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "expected a JPEG stream");
}

#[test]
fn process_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out_without_extension");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[export]\nformat = \"jpeg\"\nquality = 60\n").unwrap();

    let output = run(rasterflow_bin()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .arg(&out));
    assert!(output.status.success());
    assert!(stdout(&output).contains("quality 60"));

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn process_reports_bad_chain() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path());

    let output = run(rasterflow_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.png"))
        .args(["--chain", "blur:gamma=2"]));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("gamma"));
}

#[test]
fn process_reports_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = run(rasterflow_bin()
        .arg("process")
        .arg(dir.path().join("absent.png"))
        .arg(dir.path().join("out.png")));
    assert!(!output.status.success());
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn missing_explicit_config_fails() {
    let output = run(rasterflow_bin().args(["--config", "/definitely/absent.toml", "operators"]));
    assert!(!output.status.success());
}
