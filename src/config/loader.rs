use crate::config::Config;
use crate::utils::{Result, WorkbenchError};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default config file path: ~/.config/openalgo-workbench/config.yaml
pub fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| WorkbenchError::config("HOME environment variable not set"))?;

    let mut path = PathBuf::from(home);
    path.push(".config");
    path.push("openalgo-workbench");
    path.push("config.yaml");

    Ok(path)
}

/// Load configuration from file, or return default if file doesn't exist
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        log::info!("Loading config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        check_layout(&mut config);
        Ok(config)
    } else {
        log::info!("Config file not found at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

/// Replace layout values the pane math cannot work with
fn check_layout(config: &mut Config) {
    let min = config.layout.min_pane_width;
    if !min.is_finite() || min <= 0.0 {
        log::warn!(
            "Invalid layout.min_pane_width {}, using {}",
            min,
            crate::pane::MIN_PANE_WIDTH
        );
        config.layout.min_pane_width = crate::pane::MIN_PANE_WIDTH;
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;

    log::info!("Config saved to: {}", path.display());
    Ok(())
}

/// Initialize config directory and create default config if it doesn't exist
pub fn init_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => default_config_path()?,
    };

    if config_path.exists() {
        return load_config(&config_path);
    }

    if explicit {
        // If custom path specified but doesn't exist, return error
        return Err(WorkbenchError::config(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    // Only auto-create if using default path
    log::info!("Creating default config file at: {}", config_path.display());
    let default_config = Config::default();
    save_config(&default_config, &config_path)?;
    Ok(default_config)
}
