use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the config home at a test directory and clears artifact overrides.
pub struct OncoserveEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

const VARS: [&str; 3] = [
    "ONCOSERVE_CONFIG_HOME",
    "ONCOSERVE_MODEL_PATH",
    "ONCOSERVE_SCALER_PATH",
];

impl OncoserveEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = VARS
            .iter()
            .map(|key| (*key, std::env::var(key).ok()))
            .collect();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("ONCOSERVE_CONFIG_HOME", path);
            std::env::remove_var("ONCOSERVE_MODEL_PATH");
            std::env::remove_var("ONCOSERVE_SCALER_PATH");
        }
        Self {
            previous,
            _lock: lock,
        }
    }

    pub fn set_var(&self, key: &str, value: &str) {
        // SAFETY: the guard holds the global env lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

impl Drop for OncoserveEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
