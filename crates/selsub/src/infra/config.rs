//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".selsub/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub logging: Logging,
    /// Directory relative storage paths resolve against. Not read from files.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Values a layer leaves unset fall through to lower layers, then to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Storage {
    #[serde(default)]
    settings_path: Option<PathBuf>,
}

impl Storage {
    fn default_settings_path() -> PathBuf {
        PathBuf::from(".selsub/settings.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(Self::default_settings_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Logging {
    #[serde(default)]
    filter: Option<String>,
}

impl Logging {
    fn default_filter() -> &'static str {
        "warn"
    }

    pub fn filter(&self) -> String {
        self.filter
            .clone()
            .unwrap_or_else(|| Self::default_filter().to_owned())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    settings_path: Option<PathBuf>,
    log_filter: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            settings_path: env::var_os("SELSUB_SETTINGS_PATH").map(PathBuf::from),
            log_filter: env::var("SELSUB_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(settings_path: &str, log_filter: &str) -> Self {
        Self {
            settings_path: Some(settings_path.into()),
            log_filter: Some(log_filter.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let cwd = env::current_dir().context("failed to resolve current directory")?;
        let root = find_repo_root(&cwd).unwrap_or(cwd);
        let workspace = Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH));
        let mut config = Self::load_with_layers(global_config_path(), workspace, env)?;
        config.root = root;
        Ok(config)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            storage: merge_storage(self.storage, other.storage),
            logging: merge_logging(self.logging, other.logging),
            root: self.root,
        }
    }

    /// Absolute location of the persisted find/replace settings.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(self.storage.settings_path())
    }
}

fn merge_storage(mut base: Storage, overlay: Storage) -> Storage {
    if let Some(value) = overlay.settings_path {
        base.settings_path = Some(value);
    }
    base
}

fn merge_logging(mut base: Logging, overlay: Logging) -> Logging {
    if let Some(value) = overlay.filter {
        base.filter = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("selsub/config.toml"))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(settings_path) = env.settings_path {
        config.storage.settings_path = Some(settings_path);
    }
    if let Some(log_filter) = env.log_filter {
        config.logging.filter = Some(log_filter);
    }
    config
}
