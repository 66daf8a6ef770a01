use crate::renderer::backend::Color;

/// Theme preference from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    System,
    Dark,
    Light,
}

impl ThemePreference {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "dark" => Self::Dark,
            "light" => Self::Light,
            "system" => Self::System,
            other => {
                log::warn!("Unknown theme {:?}, following system theme", other);
                Self::System
            }
        }
    }
}

/// Resolved color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Resolve a preference against the window system's theme
    pub fn resolve(preference: ThemePreference, system: Option<winit::window::Theme>) -> Self {
        match preference {
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::Light => Theme::Light,
            ThemePreference::System => match system {
                Some(winit::window::Theme::Light) => Theme::Light,
                _ => Theme::Dark,
            },
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::rgb(18, 18, 20),
                navbar: Color::rgb(28, 28, 32),
                pane: Color::rgb(30, 30, 30),
                header: Color::rgb(40, 40, 44),
                active_tab: Color::rgb(58, 58, 64),
                text: Color::rgb(220, 220, 220),
                muted_text: Color::rgb(140, 140, 150),
                divider: Color::rgb(50, 50, 56),
                divider_active: Color::rgb(100, 150, 255),
                accent: Color::rgb(100, 150, 255),
                overlay: Color::rgb(40, 40, 60),
            },
            Theme::Light => Palette {
                background: Color::rgb(240, 240, 243),
                navbar: Color::rgb(250, 250, 252),
                pane: Color::rgb(255, 255, 255),
                header: Color::rgb(243, 243, 246),
                active_tab: Color::rgb(225, 228, 236),
                text: Color::rgb(30, 30, 36),
                muted_text: Color::rgb(110, 110, 120),
                divider: Color::rgb(215, 215, 222),
                divider_active: Color::rgb(40, 110, 230),
                accent: Color::rgb(40, 110, 230),
                overlay: Color::rgb(232, 236, 248),
            },
        }
    }
}

/// Colors used to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub navbar: Color,
    pub pane: Color,
    pub header: Color,
    pub active_tab: Color,
    pub text: Color,
    pub muted_text: Color,
    pub divider: Color,
    pub divider_active: Color,
    pub accent: Color,
    pub overlay: Color,
}
