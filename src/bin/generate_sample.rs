use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

use spectral_chart::data::excitation::{ExcitationRecord, PoleUnit, stick_series};
use spectral_chart::{ConvolutionSample, SpectrumData, SpectrumKind, Stick};

/// Gaussian half-width in hartree.
const GAMMA: f64 = 0.01;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Broaden sticks given in hartree on an energy grid, then express the curve
/// and the sticks in nm with increasing x.
fn broaden_nm(sticks_au: &[Stick]) -> SpectrumData {
    let lo = sticks_au.iter().map(|s| s.poles).fold(f64::INFINITY, f64::min) - 5.0 * GAMMA;
    let hi = sticks_au.iter().map(|s| s.poles).fold(f64::NEG_INFINITY, f64::max) + 5.0 * GAMMA;
    let n = 500;
    let mut convolution: Vec<ConvolutionSample> = (0..n)
        .map(|i| {
            let e = lo + (hi - lo) * i as f64 / (n - 1) as f64;
            let y: f64 = sticks_au
                .iter()
                .map(|s| gaussian(e, s.poles, GAMMA, s.residues))
                .sum();
            ConvolutionSample {
                x: PoleUnit::Nm.from_hartree(e),
                y,
            }
        })
        .collect();
    convolution.reverse();

    let sticks = sticks_au
        .iter()
        .map(|s| Stick {
            poles: PoleUnit::Nm.from_hartree(s.poles),
            residues: s.residues,
        })
        .collect();
    SpectrumData::new(convolution, sticks)
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    // Eight singlet states of a small chiral molecule, energies in hartree.
    let states: [(f64, [f64; 3], f64); 8] = [
        (0.2667, [0.112, -0.034, 0.051], 0.0107),
        (0.2834, [-0.041, 0.210, 0.018], -0.0072),
        (0.2911, [0.305, 0.022, -0.119], 0.0031),
        (0.3045, [0.008, -0.015, 0.240], -0.0154),
        (0.3120, [0.451, 0.130, 0.062], 0.0093),
        (0.3262, [-0.070, 0.388, -0.201], 0.0118),
        (0.3339, [0.012, 0.004, 0.019], -0.0021),
        (0.3471, [0.620, -0.287, 0.144], -0.0098),
    ];

    let excitations: Vec<ExcitationRecord> = states
        .iter()
        .map(|&(energy, dipole, rotatory)| ExcitationRecord {
            excitation_energy: energy,
            electric_dipole: dipole,
            rotatory_strength: rotatory,
        })
        .collect();

    let raw: Vec<serde_json::Value> = excitations
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut v = serde_json::to_value(r).expect("Failed to serialize excitation");
            v["SYMMETRY"] = json!("A");
            v["SPIN MULT"] = json!("singlet");
            v["INDEX"] = json!(i + 1);
            v
        })
        .collect();
    let path = out_dir.join("excitations.json");
    std::fs::write(&path, serde_json::to_string_pretty(&raw).expect("Failed to serialize"))
        .expect("Failed to write excitations");

    // OPA: full JSON record.
    let opa_au = stick_series(&excitations, SpectrumKind::Opa, PoleUnit::Au)
        .expect("Failed to build OPA sticks");
    let opa = broaden_nm(&opa_au);
    let path = out_dir.join("opa.json");
    std::fs::write(&path, serde_json::to_string_pretty(&opa).expect("Failed to serialize"))
        .expect("Failed to write OPA record");

    // ECD: convolution only, as Parquet; the sticks come from the excitations.
    let ecd_au = stick_series(&excitations, SpectrumKind::Ecd, PoleUnit::Au)
        .expect("Failed to build ECD sticks");
    let ecd = broaden_nm(&ecd_au);
    let curve = ecd.convolution.expect("convolution was just built");

    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(curve.iter().map(|s| s.x))),
            Arc::new(Float64Array::from_iter_values(curve.iter().map(|s| s.y))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let path = out_dir.join("ecd_convolution.parquet");
    let file = std::fs::File::create(&path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    let config = r#"output = "moxy.html"

[[panels]]
kind = "opa"
record = "opa.json"

[[panels]]
kind = "ecd"
convolution = "ecd_convolution.parquet"
excitations = "excitations.json"
units = "nm"
"#;
    std::fs::write(out_dir.join("moxy.toml"), config).expect("Failed to write config");

    println!(
        "Wrote {} excitations and OPA/ECD spectra ({} samples each) to {}",
        excitations.len(),
        curve.len(),
        out_dir.display()
    );
}
