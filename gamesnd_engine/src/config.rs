use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODULAR_SUFFIX: &str = "-snd.tbm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// When false every load pass and play call is a no-op.
    pub sound_enabled: bool,
    /// Seed for entry selection and volume/pitch sampling; entropy when unset.
    pub rng_seed: Option<u64>,
    /// Interface sound played when the pointer first moves over a control.
    pub highlight_sound: Option<String>,
    /// Interface sound played on a rejected action.
    pub error_sound: Option<String>,
    /// File name suffix of modular tables next to the primary table.
    pub modular_suffix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            rng_seed: None,
            highlight_sound: None,
            error_sound: None,
            modular_suffix: DEFAULT_MODULAR_SUFFIX.to_string(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<RegistryConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading registry config {}", path.display()))?;
    let config: RegistryConfig = serde_json::from_str(&data)
        .with_context(|| format!("parsing registry config {}", path.display()))?;
    Ok(config)
}
