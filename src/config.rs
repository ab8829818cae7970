use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Browser origins allowed by CORS. `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// Load the CSV on `serve` startup when the store is empty.
    #[serde(default = "default_auto_import")]
    pub auto_import: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            auto_import: default_auto_import(),
        }
    }
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("./data/vb_mapp_milestones.csv")
}
fn default_auto_import() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.server.cors_origins.iter().any(|o| o.trim().is_empty()) {
        anyhow::bail!("server.cors_origins entries must not be empty");
    }

    if config.import.csv_path.as_os_str().is_empty() {
        anyhow::bail!("import.csv_path must not be empty");
    }

    Ok(())
}
