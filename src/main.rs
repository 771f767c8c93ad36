//! Command-line entry point: run one prediction or report liveness.

use std::io::Read;
use std::path::PathBuf;

use oncoserve::{InferencePipeline, ModelRegistry, config, logging, transport};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    health: bool,
    payload: Option<PathBuf>,
}

fn run() -> Result<bool, String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = config::load(options.config_path.as_deref()).map_err(|err| err.to_string())?;
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("Logging disabled: {err}");
    }

    let state = ModelRegistry::initialize(&config.artifacts.source());
    let reply = if options.health {
        transport::health(&state)
    } else {
        let body = read_payload(options.payload.as_ref())?;
        transport::handle_predict(&InferencePipeline::new(state), &body)
    };

    let rendered = serde_json::to_string_pretty(&reply.body).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(reply.is_success())
}

fn read_payload(path: Option<&PathBuf>) -> Result<Vec<u8>, String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read(path)
            .map_err(|err| format!("Failed to read payload {}: {err}", path.display())),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| format!("Failed to read payload from stdin: {err}"))?;
            Ok(buf)
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--health" => options.health = true,
            value if value == "-" || !value.starts_with('-') => {
                if options.payload.is_some() {
                    return Err(format!("Unexpected extra argument: {value}"));
                }
                options.payload = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "oncoserve",
        "",
        "Classifies one tissue sample from a JSON object of 30 named measurements.",
        "",
        "Usage:",
        "  oncoserve [--config <file>] [<payload.json> | -]",
        "  oncoserve [--config <file>] --health",
        "",
        "Options:",
        "  --config <file>   Config file (default: <config dir>/.oncoserve/config.toml).",
        "  --health          Print the liveness report instead of predicting.",
        "",
        "The payload is read from stdin when no file (or `-`) is given.",
        "Exit status: 0 on success, 1 when the request was rejected, 2 on setup errors.",
    ]
    .join("\n")
}
