use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;
use tempfile::TempDir;

use spectral_chart::chart::html::write_html;
use spectral_chart::data::loader::{load_convolution, load_excitations};
use spectral_chart::{Config, Layout, render};

fn write_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float32, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(vec![130.0, 150.0, 170.0])),
            Arc::new(Float32Array::from(vec![0.5_f32, -1.0, 0.25])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn write_fixture(dir: &Path) {
    std::fs::write(
        dir.join("opa.json"),
        json!({
            "convolution": [{"x": 130.0, "y": 0.1}, {"x": 150.0, "y": 2.0}],
            "sticks": [{"poles": 148.0, "residues": 0.4}]
        })
        .to_string(),
    )
    .unwrap();
    write_parquet(&dir.join("ecd.parquet"));
    std::fs::write(
        dir.join("excitations.json"),
        json!([
            {
                "EXCITATION ENERGY": 0.30,
                "ELECTRIC DIPOLE TRANSITION MOMENT (LEN)": [0.1, 0.0, 0.0],
                "ROTATORY STRENGTH (LEN)": -0.01,
                "SPIN MULT": "singlet"
            },
            {
                "EXCITATION ENERGY": 0.33,
                "ELECTRIC DIPOLE TRANSITION MOMENT (LEN)": [0.0, 0.2, 0.0],
                "ROTATORY STRENGTH (LEN)": 0.02,
                "SPIN MULT": "singlet"
            }
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.join("plot.toml"),
        r#"output = "out.html"

[[panels]]
kind = "opa"
record = "opa.json"

[[panels]]
kind = "ecd"
convolution = "ecd.parquet"
excitations = "excitations.json"
units = "nm"
offset = 10
"#,
    )
    .unwrap();
}

#[test]
fn parquet_convolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("curve.parquet");
    write_parquet(&path);
    let curve = load_convolution(&path).unwrap();
    assert_eq!(curve.len(), 3);
    assert_eq!(curve[1].x, 150.0);
    assert_eq!(curve[1].y, -1.0);
}

#[test]
fn excitation_file() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let records = load_excitations(&dir.path().join("excitations.json")).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].rotatory_strength, 0.02);
}

#[test]
fn config_to_html() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let config = Config::load(dir.path().join("plot.toml")).unwrap();
    assert_eq!(config.output, dir.path().join("out.html"));

    let spec = render(&config).unwrap();
    let charts = spec.spec.charts();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].title, "OPA (Gaussian broadening)");

    // ECD sticks come from the excitations, converted to nm.
    let poles = charts[1].layers()[3].field_values("poles");
    assert_eq!(poles.len(), 2);
    assert!((poles[0] - 45.5633525291 / 0.30).abs() < 1e-9);
    assert_eq!(charts[1].layers()[3].field_values("residues"), vec![-0.01, 0.02]);

    write_html(&config.output, &spec).unwrap();
    let html = std::fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("\"vconcat\""));
    assert!(html.contains("ECD (Gaussian broadening)"));
}

#[test]
fn horizontal_layout() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let toml = std::fs::read_to_string(dir.path().join("plot.toml")).unwrap();
    std::fs::write(
        dir.path().join("plot.toml"),
        toml.replace("output = \"out.html\"\n", "output = \"out.html\"\nlayout = \"horizontal\"\n"),
    )
    .unwrap();

    let config = Config::load(dir.path().join("plot.toml")).unwrap();
    assert_eq!(config.layout, Layout::Horizontal);

    let spec = render(&config).unwrap();
    let value = serde_json::to_value(&spec).unwrap();
    assert!(value.get("vconcat").is_none());
    let charts = value["hconcat"].as_array().unwrap();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[1]["title"], "ECD (Gaussian broadening)");
    // side-by-side panels still get their own hover selection
    assert_eq!(spec.spec.charts()[0].selection_names(), vec!["hover_0"]);
    assert_eq!(spec.spec.charts()[1].selection_names(), vec!["hover_1"]);
}

#[test]
fn record_missing_sticks_aborts_render() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        json!({"convolution": [{"x": 1.0, "y": 1.0}]}).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("plot.toml"),
        "[[panels]]\nrecord = \"bad.json\"\n",
    )
    .unwrap();

    let config = Config::load(dir.path().join("plot.toml")).unwrap();
    let err = render(&config).unwrap_err();
    assert!(format!("{err:#}").contains("missing the 'sticks' series"));
}
