//! Developer utility to evaluate the configured artifacts against a labeled CSV.

use std::path::PathBuf;

use oncoserve::ml::features::feature_index;
use oncoserve::ml::metrics::{ConfusionMatrix, accuracy, precision_recall_by_class};
use oncoserve::{Diagnosis, FeatureVector, InferencePipeline, ModelRegistry, config, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    dataset: PathBuf,
    config_path: Option<PathBuf>,
    label_column: String,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = config::load(options.config_path.as_deref()).map_err(|err| err.to_string())?;
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("Logging disabled: {err}");
    }
    let pipeline = InferencePipeline::new(ModelRegistry::initialize(&config.artifacts.source()));
    if !pipeline.is_ready() {
        return Err("Model or scaler not loaded; see the log output above".to_string());
    }

    let mut reader = csv::Reader::from_path(&options.dataset)
        .map_err(|err| format!("Failed to open {}: {err}", options.dataset.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| err.to_string())?
        .iter()
        .map(normalize_header)
        .collect();
    let label_idx = headers
        .iter()
        .position(|name| *name == options.label_column)
        .ok_or_else(|| format!("Missing label column {}", options.label_column))?;

    let mut cm = ConfusionMatrix::new();
    let mut skipped = 0usize;
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| err.to_string())?;
        let Some(truth) = record.get(label_idx).and_then(parse_diagnosis) else {
            skipped += 1;
            continue;
        };
        let (pairs, bad_cells) = feature_cells(&headers, record.iter());
        for (column, raw) in bad_cells {
            tracing::warn!(row = row_idx + 1, column, raw, "Cell is not a number");
        }
        let vector = match FeatureVector::from_named(pairs) {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(row = row_idx + 1, "Skipping row: {err}");
                skipped += 1;
                continue;
            }
        };
        let prediction = pipeline
            .predict_vector(&vector)
            .map_err(|err| format!("Row {}: {err}", row_idx + 1))?;
        cm.add(truth, prediction.diagnosis);
    }

    if cm.total() == 0 {
        return Err("No usable rows in dataset".to_string());
    }
    println!("rows evaluated: {} (skipped {skipped})", cm.total());
    println!("accuracy: {:.4}", accuracy(&cm));
    for stats in precision_recall_by_class(&cm) {
        println!(
            "{:<10} precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            stats.class.as_str(),
            stats.precision,
            stats.recall,
            stats.f1(),
            stats.support
        );
    }
    println!("confusion matrix (rows=true, cols=pred; benign, malignant):");
    for truth in [Diagnosis::Benign, Diagnosis::Malignant] {
        println!(
            "{:6}{:6}",
            cm.get(truth, Diagnosis::Benign),
            cm.get(truth, Diagnosis::Malignant)
        );
    }
    Ok(())
}

/// Split a row into parsed feature values and feature cells that are not numbers.
///
/// Columns outside the feature schema are skipped.
fn feature_cells<'a, 'r>(
    headers: &'a [String],
    cells: impl Iterator<Item = &'r str>,
) -> (Vec<(&'a str, f64)>, Vec<(&'a str, &'r str)>) {
    let mut pairs = Vec::with_capacity(headers.len());
    let mut bad = Vec::new();
    for (name, raw) in headers.iter().zip(cells) {
        if feature_index(name).is_none() {
            continue;
        }
        match raw.trim().parse::<f64>() {
            Ok(value) => pairs.push((name.as_str(), value)),
            Err(_) => bad.push((name.as_str(), raw)),
        }
    }
    (pairs, bad)
}

/// `concave points_mean` in the public dataset becomes `concave_points_mean`.
fn normalize_header(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn parse_diagnosis(raw: &str) -> Option<Diagnosis> {
    match raw.trim() {
        "M" | "m" | "1" => Some(Diagnosis::Malignant),
        "B" | "b" | "0" => Some(Diagnosis::Benign),
        _ => None,
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut dataset: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut label_column = "diagnosis".to_string();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--dataset" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--dataset requires a value".to_string())?;
                dataset = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--label-column" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--label-column requires a value".to_string())?;
                label_column = value.clone();
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let dataset = dataset.ok_or_else(help_text)?;
    Ok(CliOptions {
        dataset,
        config_path,
        label_column,
    })
}

fn help_text() -> String {
    [
        "oncoserve-eval",
        "",
        "Scores the configured scaler and classifier against a labeled CSV.",
        "",
        "Usage:",
        "  oncoserve-eval --dataset <data.csv> [--config <file>] [--label-column <name>]",
        "",
        "Options:",
        "  --dataset <file>        CSV with a header row and one sample per line (required).",
        "  --config <file>         Config file naming the artifact paths.",
        "  --label-column <name>   Column holding M/B labels (default: diagnosis).",
    ]
    .join("\n")
}
