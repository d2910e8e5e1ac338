use std::path::Path;

use approx::assert_abs_diff_eq;
use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::tempdir;
use test_case::test_case;

fn write_excitations(dir: &Path) {
    std::fs::write(
        dir.join("excitations.json"),
        json!([
            {
                "EXCITATION ENERGY": 0.25,
                "ELECTRIC DIPOLE TRANSITION MOMENT (LEN)": [0.3, 0.4, 0.0],
                "ROTATORY STRENGTH (LEN)": -0.01
            },
            {
                "EXCITATION ENERGY": 0.5,
                "ELECTRIC DIPOLE TRANSITION MOMENT (LEN)": [0.0, 0.0, 1.0],
                "ROTATORY STRENGTH (LEN)": 0.02
            }
        ])
        .to_string(),
    )
    .unwrap();
}

fn sticks(stdout: &[u8]) -> Vec<(f64, f64)> {
    let value: Value = serde_json::from_slice(stdout).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["poles"].as_f64().unwrap(), s["residues"].as_f64().unwrap()))
        .collect()
}

#[test_case("opa", "au", [(0.25, 0.25), (0.5, 1.0)]; "opa hartree")]
#[test_case("ecd", "au", [(0.25, -0.01), (0.5, 0.02)]; "ecd hartree")]
#[test_case("opa", "ev", [(6.802_846_561_497, 0.25), (13.605_693_122_994, 1.0)]; "opa electronvolt")]
fn sticks_to_stdout(kind: &str, units: &str, want: [(f64, f64); 2]) {
    let dir = tempdir().unwrap();
    write_excitations(dir.path());

    let assert = Command::cargo_bin("spectral-chart")
        .unwrap()
        .args(["sticks", "excitations.json", "--kind", kind, "--units", units])
        .current_dir(&dir)
        .assert()
        .success();

    let got = sticks(&assert.get_output().stdout);
    assert_eq!(got.len(), want.len());
    for ((pole, residue), (want_pole, want_residue)) in got.into_iter().zip(want) {
        assert_abs_diff_eq!(pole, want_pole, epsilon = 1e-9);
        assert_abs_diff_eq!(residue, want_residue, epsilon = 1e-12);
    }
}

#[test]
fn sticks_to_file() {
    let dir = tempdir().unwrap();
    write_excitations(dir.path());

    Command::cargo_bin("spectral-chart")
        .unwrap()
        .args(["sticks", "excitations.json", "-k", "ecd", "-o", "sticks.json"])
        .current_dir(&dir)
        .assert()
        .success();

    let text = std::fs::read(dir.path().join("sticks.json")).unwrap();
    assert_eq!(sticks(&text), vec![(0.25, -0.01), (0.5, 0.02)]);
}

#[test]
fn sticks_rejects_empty_results() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("excitations.json"), "[]").unwrap();

    let assert = Command::cargo_bin("spectral-chart")
        .unwrap()
        .args(["sticks", "excitations.json", "--kind", "opa"])
        .current_dir(&dir)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("no excitation records"), "stderr: {stderr}");
}

#[test]
fn render_json_to_stdout() {
    let dir = tempdir().unwrap();
    write_excitations(dir.path());
    std::fs::write(
        dir.path().join("curve.json"),
        json!([{"x": 0.2, "y": 0.1}, {"x": 0.3, "y": 2.0}]).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("plot.toml"),
        r#"layout = "horizontal"

[[panels]]
kind = "opa"
convolution = "curve.json"
excitations = "excitations.json"
"#,
    )
    .unwrap();

    let assert = Command::cargo_bin("spectral-chart")
        .unwrap()
        .args(["render", "plot.toml", "--json"])
        .current_dir(&dir)
        .assert()
        .success();

    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["hconcat"].as_array().unwrap().len(), 1);
    assert!(!dir.path().join("spectra.html").exists());
}
