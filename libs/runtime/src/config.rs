use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::home_dir::resolve_home_dir;

const DEFAULT_DATABASE_URL: &str = "sqlite://database/members.db";

/// Top-level configuration of the approval admin.
///
/// Global sections are typed; module settings live in the `modules` bag and
/// are decoded by the module that owns them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub app: ApplicationConfig,
    /// Members database; required by every command except `check`.
    pub database: Option<DatabaseConfig>,
    pub logging: Option<LoggingConfig>,
    /// Extra `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// module name → raw settings, e.g. `member_approval: { max_bulk_size: 20 }`
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationConfig {
    pub home_dir: String, // normalized to an absolute path on load
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://<path>` (relative to `app.home_dir`) or `postgres://...`
    pub url: String,
    /// Pool size; forced to 1 for in-memory SQLite.
    pub max_conns: Option<u32>,
    /// Applied as `PRAGMA busy_timeout` on file-backed SQLite.
    pub busy_timeout_ms: Option<u32>,
}

/// Target prefix (crate name) → log section; `"default"` catches the rest.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // trace | debug | info | warn | error | off
    pub file: String,          // "logs/approval.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        // Empty => $HOME/.member_approval (or %APPDATA% on Windows)
        Self {
            home_dir: String::new(),
        }
    }
}

/// Everything to `logs/member_approval.log`; SQL driver chatter only from warn up.
pub fn default_logging_config() -> LoggingConfig {
    let section = |console: &str, file: &str, file_level: &str| Section {
        console_level: console.to_owned(),
        file: file.to_owned(),
        file_level: file_level.to_owned(),
        max_size_mb: Some(100),
    };
    HashMap::from([
        (
            "default".to_owned(),
            section("info", "logs/member_approval.log", "debug"),
        ),
        ("sea_orm".to_owned(), section("warn", "", "warn")),
    ])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: ApplicationConfig::default(),
            database: Some(DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_owned(),
                max_conns: Some(10),
                busy_timeout_ms: Some(5000),
            }),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Layered load: built-in base, then the YAML file, then `APP__*` env vars.
    /// Also normalizes `app.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            app: ApplicationConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path))
            // APP__DATABASE__URL=sqlite://x.db maps to database.url
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        normalize_home_dir_inplace(&mut config.app).context("Failed to resolve app.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.app)
                    .context("Failed to resolve app.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `-v` raises console logging to debug, `-vv` and more to trace.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(),
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line arguments relevant to configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

/// Source of raw per-module settings.
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;

    /// Best-effort: deserialize the module's config into `T`, falling back to
    /// `T::default()` if the section is missing or invalid.
    fn module_config<T: DeserializeOwned + Default>(&self, module_name: &str) -> T
    where
        Self: Sized,
    {
        self.get_module_config(module_name)
            .and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// `ConfigProvider` backed by a loaded `AppConfig`.
pub struct AppConfigProvider {
    config: AppConfig,
}

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.config.modules.get(module_name)
    }
}

const fn default_subdir() -> &'static str {
    ".member_approval"
}

fn normalize_home_dir_inplace(app: &mut ApplicationConfig) -> Result<()> {
    let opt = if app.home_dir.trim().is_empty() {
        None
    } else {
        Some(app.home_dir.clone())
    };

    let resolved: PathBuf =
        resolve_home_dir(opt, default_subdir(), true).context("home_dir normalization failed")?;

    app.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)?;
        bag.insert(name, serde_json::to_value(val)?);
    }
    Ok(())
}
