use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default generated-passphrase length when neither the flag nor the
/// config give one.
pub const DEFAULT_LENGTH: usize = 36;

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywardenConfig {
    pub vault: VaultSection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratorSection {
    pub wordlist: Option<String>,
    pub default_length: usize,
    pub special_characters: bool,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            wordlist: None,
            default_length: DEFAULT_LENGTH,
            special_characters: false,
        }
    }
}

impl KeywardenConfig {
    pub fn new(vault_path: PathBuf) -> Self {
        Self {
            vault: VaultSection {
                path: vault_path.to_string_lossy().to_string(),
            },
            generator: GeneratorSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("keywarden.vault"))
}

/// Read the config file if one exists at the default location.
pub fn load_config() -> anyhow::Result<Option<KeywardenConfig>> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_config(&path).map(Some)
}

pub fn read_config(path: &Path) -> anyhow::Result<KeywardenConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &KeywardenConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("keywarden"));
        }
    }
    Ok(home_dir()?.join(".config").join("keywarden"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("keywarden"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("keywarden"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
