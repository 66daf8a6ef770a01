use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub appearance: AppearanceConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,

    /// Initial window width
    #[serde(default = "default_width")]
    pub width: u32,

    /// Initial window height
    #[serde(default = "default_height")]
    pub height: u32,

    /// Maximize window on startup
    #[serde(default = "default_maximize")]
    pub maximize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Narrowest width a pane may be dragged to, in pixels
    #[serde(default = "default_min_pane_width")]
    pub min_pane_width: f64,

    /// Visible thickness of a divider handle
    #[serde(default = "default_divider_width")]
    pub divider_width: u32,

    /// How far from a divider (each side) a press still grabs it
    #[serde(default = "default_divider_hit_slop")]
    pub divider_hit_slop: f64,

    /// Height of the top navigation bar
    #[serde(default = "default_navbar_height")]
    pub navbar_height: u32,

    /// Height of each pane's tab header
    #[serde(default = "default_header_height")]
    pub header_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Theme preference: "system", "dark", or "light"
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Persist pane ratios across restarts within the login session
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Session identifier; falls back to $XDG_SESSION_ID
    #[serde(default)]
    pub session_id: Option<String>,

    /// Root directory for session storage; falls back to $XDG_RUNTIME_DIR
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

// Default functions
fn default_title() -> String {
    "OpenAlgorithms".to_string()
}

fn default_width() -> u32 {
    1600
}

fn default_height() -> u32 {
    900
}

fn default_maximize() -> bool {
    false
}

fn default_min_pane_width() -> f64 {
    crate::pane::MIN_PANE_WIDTH
}

fn default_divider_width() -> u32 {
    6
}

fn default_divider_hit_slop() -> f64 {
    8.0
}

fn default_navbar_height() -> u32 {
    40
}

fn default_header_height() -> u32 {
    32
}

fn default_theme() -> String {
    "system".to_string()
}

fn default_font_size() -> f32 {
    14.0
}

fn default_persist() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            maximize: default_maximize(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_pane_width: default_min_pane_width(),
            divider_width: default_divider_width(),
            divider_hit_slop: default_divider_hit_slop(),
            navbar_height: default_navbar_height(),
            header_height: default_header_height(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: default_font_size(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            session_id: None,
            storage_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = serde_yaml::from_str("window:\n  title: practice\n").unwrap();

        assert_eq!(config.window.title, "practice");
        assert_eq!(config.window.width, 1600);
        assert_eq!(config.layout.min_pane_width, 400.0);
        assert_eq!(config.appearance.theme, "system");
        assert!(config.session.persist);
        assert!(config.session.session_id.is_none());
    }

    #[test]
    fn test_partial_layout_section() {
        let yaml = "layout:\n  min_pane_width: 250\n  divider_hit_slop: 4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.layout.min_pane_width, 250.0);
        assert_eq!(config.layout.divider_hit_slop, 4.0);
        assert_eq!(config.layout.divider_width, 6);
        assert_eq!(config.layout.header_height, 32);
    }
}
