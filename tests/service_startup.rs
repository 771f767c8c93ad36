mod support;

use oncoserve::{
    ArtifactSource, InferencePipeline, ModelRegistry, PipelineState, config, transport,
};
use serde_json::json;
use support::env::OncoserveEnvGuard;
use support::fixtures::{sample_payload, write_constant_artifacts, write_json};
use tempfile::tempdir;

fn startup(source: &dyn ArtifactSource) -> (PipelineState, InferencePipeline) {
    let state = ModelRegistry::initialize(source);
    let pipeline = InferencePipeline::new(state.clone());
    (state, pipeline)
}

#[test]
fn config_home_drives_artifact_paths() {
    let home = tempdir().unwrap();
    let artifacts = tempdir().unwrap();
    let _guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let (scaler_path, model_path) = write_constant_artifacts(artifacts.path(), 3.0);

    let config_path = config::config_path().unwrap();
    let toml_text = format!(
        "[artifacts]\nmodel_path = {:?}\nscaler_path = {:?}\n\n[logging]\nlevel = \"debug\"\n",
        model_path.display().to_string(),
        scaler_path.display().to_string(),
    );
    std::fs::write(&config_path, toml_text).unwrap();

    let config = config::load(None).unwrap();
    assert_eq!(config.artifacts.model_path, model_path);
    assert_eq!(config.logging.level, "debug");

    let (state, pipeline) = startup(&config.artifacts.source());
    assert!(state.is_ready());
    let body = serde_json::to_vec(&sample_payload()).unwrap();
    let reply = transport::handle_predict(&pipeline, &body);
    assert_eq!(reply.status, transport::STATUS_OK);
    assert_eq!(reply.body, json!({ "prediction": "Malignant" }));
}

#[test]
fn env_overrides_win_over_config_file() {
    let home = tempdir().unwrap();
    let artifacts = tempdir().unwrap();
    let guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let (scaler_path, model_path) = write_constant_artifacts(artifacts.path(), -3.0);
    std::fs::write(
        config::config_path().unwrap(),
        "[artifacts]\nmodel_path = \"nowhere/model.json\"\nscaler_path = \"nowhere/scaler.json\"\n",
    )
    .unwrap();
    guard.set_var(config::MODEL_PATH_ENV, &model_path.display().to_string());
    guard.set_var(config::SCALER_PATH_ENV, &scaler_path.display().to_string());

    let config = config::load(None).unwrap();
    let (_, pipeline) = startup(&config.artifacts.source());
    let reply = transport::handle_predict(
        &pipeline,
        &serde_json::to_vec(&sample_payload()).unwrap(),
    );
    assert_eq!(reply.body["prediction"], "Benign");
}

#[test]
fn missing_artifacts_keep_the_process_up() {
    let home = tempdir().unwrap();
    let artifacts = tempdir().unwrap();
    let guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let (scaler_path, _) = write_constant_artifacts(artifacts.path(), 1.0);
    guard.set_var(config::SCALER_PATH_ENV, &scaler_path.display().to_string());
    guard.set_var(
        config::MODEL_PATH_ENV,
        &artifacts.path().join("absent.json").display().to_string(),
    );

    let config = config::load(None).unwrap();
    let (state, pipeline) = startup(&config.artifacts.source());
    assert!(!state.is_ready());

    let health = transport::health(&state);
    assert_eq!(health.status, transport::STATUS_OK);
    assert_eq!(health.body["status"], "unavailable");
    assert_eq!(health.body["scaler_loaded"], true);
    assert_eq!(health.body["model_loaded"], false);

    let reply = transport::handle_predict(&pipeline, b"not even json");
    assert_eq!(reply.status, transport::STATUS_INTERNAL_ERROR);
    assert_eq!(reply.body["error"], "model_unavailable");
}

#[test]
fn mismatched_artifact_shape_is_unavailable() {
    let home = tempdir().unwrap();
    let artifacts = tempdir().unwrap();
    let _guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let (scaler_path, model_path) = write_constant_artifacts(artifacts.path(), 1.0);
    write_json(
        &model_path,
        &json!({ "coefficients": [0.5, 0.5], "intercept": 0.0 }),
    );

    let (state, _) = startup(&oncoserve::FsArtifactSource::new(scaler_path, model_path));
    assert!(!state.is_ready());
    assert!(state.scaler_loaded());
    assert!(!state.model_loaded());
}

#[test]
fn explicit_config_path_must_exist() {
    let home = tempdir().unwrap();
    let _guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let err = config::load(Some(&home.path().join("missing.toml"))).unwrap_err();
    assert!(matches!(err, config::ConfigError::Missing { .. }));
}

#[test]
fn config_home_holds_app_and_log_dirs() {
    let home = tempdir().unwrap();
    let _guard = OncoserveEnvGuard::set_config_home(home.path().to_path_buf());
    let root = oncoserve::app_dirs::app_root_dir().unwrap();
    assert_eq!(root, home.path().join(oncoserve::app_dirs::APP_DIR_NAME));
    let logs = oncoserve::app_dirs::logs_dir().unwrap();
    assert_eq!(logs, root.join("logs"));
    assert!(logs.is_dir());
    assert_eq!(config::config_path().unwrap(), root.join(config::CONFIG_FILE_NAME));
}
