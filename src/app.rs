use crate::config::Config;
use crate::input::{ShortcutAction, ShortcutHandler};
use crate::pane::{
    Divider, LayoutController, PaneKind, PaneManager, PaneRatioStore, PointerCapture,
    PressOutcome, ProblemLayout, Rect,
};
use crate::renderer::{Color, Palette, RenderBackend, SoftbufferBackend, Theme, ThemePreference};
use crate::storage::SessionStorage;
use crate::utils::Result;
use std::sync::Arc;
use winit::window::{CursorIcon, Window};

/// Pixels added or removed per focused-pane resize shortcut
const RESIZE_STEP: f64 = 32.0;

/// Pointer capture for the desktop window: the resize cursor stays on
/// for the whole drag, even when the pointer leaves the divider
struct WindowCapture {
    window: Arc<Window>,
}

impl PointerCapture for WindowCapture {
    fn acquire(&mut self, divider: Divider) {
        log::trace!("Capturing pointer for divider {}", divider.index());
        self.window.set_cursor(CursorIcon::ColResize);
    }

    fn release(&mut self) {
        log::trace!("Releasing pointer capture");
        self.window.set_cursor(CursorIcon::Default);
    }
}

/// Central application state
pub struct App {
    pub config: Config,
    window: Arc<Window>,
    manager: PaneManager,
    renderer: Box<dyn RenderBackend>,
    shortcuts: ShortcutHandler,
    theme_preference: ThemePreference,
    theme: Theme,
    problem_slug: String,
    help_visible: bool,
    window_width: u32,
    window_height: u32,
}

impl App {
    pub fn new(
        config: Config,
        window: Arc<Window>,
        storage: Box<dyn SessionStorage>,
        problem_slug: String,
        reset_layout: bool,
    ) -> Result<Self> {
        let renderer: Box<dyn RenderBackend> =
            Box::new(SoftbufferBackend::new(window.clone(), config.appearance.font_size)?);

        let mut store = PaneRatioStore::load(storage);
        if reset_layout {
            store.reset();
        }

        let capture = Box::new(WindowCapture { window: window.clone() });
        let controller = LayoutController::new(store, capture, config.layout.min_pane_width);
        let (char_width, _) = renderer.cell_dimensions();
        let manager = PaneManager::new(controller, &config.layout, char_width);

        let theme_preference = ThemePreference::parse(&config.appearance.theme);
        let theme = Theme::resolve(theme_preference, window.theme());

        let size = window.inner_size();

        log::info!("App initialized with {:?} theme, problem {:?}", theme, problem_slug);
        log::info!("Initial pane ratios: {:?}", manager.controller().ratios());

        let mut app = Self {
            config,
            window,
            manager,
            renderer,
            shortcuts: ShortcutHandler::new(),
            theme_preference,
            theme,
            problem_slug,
            help_visible: false,
            window_width: size.width,
            window_height: size.height,
        };

        app.resize(size.width, size.height)?;
        Ok(app)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.window_width = width;
        self.window_height = height;

        // The minimized window reports 0x0; keep the last geometry
        if width > 0 && height > 0 {
            let navbar = self.config.layout.navbar_height.min(height);
            let container = Rect::new(0, navbar, width, height - navbar);
            self.manager.resize(container);
        }

        self.renderer.resize(width, height)?;
        Ok(())
    }

    /// Handle left mouse button press
    pub fn handle_mouse_press(&mut self, x: f64, y: f64) -> Result<bool> {
        if self.help_visible {
            self.help_visible = false;
            return Ok(true);
        }

        let outcome = self.manager.pointer_down(x, y);
        match outcome {
            PressOutcome::DragStarted(divider) => {
                log::debug!("Mouse press at ({}, {}) grabbed divider {}", x, y, divider.index());
            }
            PressOutcome::TabSelected(kind, tab) => {
                log::info!("Selected tab {} of {:?} pane", kind.tabs()[tab], kind);
            }
            PressOutcome::Focused(kind) => {
                log::debug!("Focused {:?} pane", kind);
            }
            PressOutcome::Ignored => {
                log::trace!("Mouse press at ({}, {}) ignored", x, y);
            }
        }

        Ok(outcome != PressOutcome::Ignored)
    }

    /// Handle left mouse button release
    pub fn handle_mouse_release(&mut self, x: f64, y: f64) -> Result<bool> {
        let ended = self.manager.pointer_up();
        if ended {
            // The capture reset the cursor; restore the hover state
            self.update_hover(x, y);
        }
        Ok(ended)
    }

    /// Handle mouse movement (for dragging dividers)
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) -> Result<bool> {
        if self.manager.dragging().is_some() {
            return Ok(self.manager.pointer_move(x));
        }

        Ok(self.update_hover(x, y))
    }

    /// Handle loss of window focus: a drag cannot survive it
    pub fn handle_focus_lost(&mut self) -> bool {
        self.manager.cancel_drag()
    }

    /// Handle system theme change
    pub fn set_system_theme(&mut self, system: winit::window::Theme) -> bool {
        if self.theme_preference != ThemePreference::System {
            return false;
        }
        let theme = Theme::resolve(self.theme_preference, Some(system));
        let changed = theme != self.theme;
        self.theme = theme;
        changed
    }

    pub fn handle_keyboard_input(
        &mut self,
        key: &winit::keyboard::PhysicalKey,
        modifiers: winit::keyboard::ModifiersState,
    ) -> Result<bool> {
        let winit::keyboard::PhysicalKey::Code(key_code) = key else {
            return Ok(false);
        };

        let Some(action) = self.shortcuts.match_shortcut(*key_code, modifiers) else {
            return Ok(false);
        };

        log::info!("Shortcut detected: {:?}", action);
        self.handle_shortcut_action(action)?;
        Ok(true)
    }

    fn handle_shortcut_action(&mut self, action: ShortcutAction) -> Result<()> {
        match action {
            ShortcutAction::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }
            ShortcutAction::CloseHelp => {
                self.help_visible = false;
            }
            ShortcutAction::ResetLayout => {
                self.manager.reset_layout();
                // Dividers moved; the next pointer move re-evaluates hover
                self.window.set_cursor(CursorIcon::Default);
            }
            ShortcutAction::GrowFocusedPane => {
                self.manager.resize_focused(RESIZE_STEP);
            }
            ShortcutAction::ShrinkFocusedPane => {
                self.manager.resize_focused(-RESIZE_STEP);
            }
            ShortcutAction::ToggleTheme => {
                // An explicit toggle stops following the system theme
                self.theme = self.theme.toggled();
                self.theme_preference = match self.theme {
                    Theme::Dark => ThemePreference::Dark,
                    Theme::Light => ThemePreference::Light,
                };
                log::info!("Theme switched to {:?}", self.theme);
            }
            ShortcutAction::NextTab => self.manager.next_tab(),
            ShortcutAction::PrevTab => self.manager.prev_tab(),
            ShortcutAction::IncreaseFontSize => self.change_font_size(1.0)?,
            ShortcutAction::DecreaseFontSize => self.change_font_size(-1.0)?,
        }
        Ok(())
    }

    /// Change font size by delta
    fn change_font_size(&mut self, delta: f32) -> Result<()> {
        let current_size = self.renderer.font_size();
        let new_size = (current_size + delta).clamp(8.0, 32.0);

        if new_size != current_size {
            log::info!("Changing font size from {} to {}", current_size, new_size);
            self.renderer.set_font_size(new_size)?;
            let (char_width, _) = self.renderer.cell_dimensions();
            self.manager.set_char_width(char_width);
        }

        Ok(())
    }

    /// Show the resize cursor while hovering a divider
    fn update_hover(&mut self, x: f64, y: f64) -> bool {
        let Some(hovering) = self.manager.hover(x, y) else {
            return false;
        };

        self.window.set_cursor(if hovering {
            CursorIcon::ColResize
        } else {
            CursorIcon::Default
        });
        true
    }

    pub fn render(&mut self) -> Result<()> {
        let palette = self.theme.palette();
        self.renderer.clear(palette.background)?;

        self.render_navbar(&palette)?;

        if let Some(layout) = self.manager.layout() {
            for kind in PaneKind::ALL {
                self.render_pane(&layout, kind, &palette)?;
            }
            self.render_dividers(&layout, &palette)?;
        }

        if self.help_visible {
            self.render_help_overlay(&palette)?;
        }

        self.renderer.present()
    }

    fn render_navbar(&mut self, palette: &Palette) -> Result<()> {
        let height = self.config.layout.navbar_height.min(self.window_height);
        let bar = Rect::new(0, 0, self.window_width, height);
        self.renderer.fill_rect(bar, palette.navbar)?;

        let (char_width, cell_height) = self.renderer.cell_dimensions();
        let text_y = ((height as f32 - cell_height) / 2.0).max(0.0) as i32;
        let brand = "OpenAlgorithms";
        self.renderer.draw_text(brand, 16, text_y, palette.accent, true, bar)?;

        let slug_x = 16 + ((brand.len() + 3) as f32 * char_width) as i32;
        self.renderer
            .draw_text(&self.problem_slug, slug_x, text_y, palette.muted_text, false, bar)?;

        let hint = "F1 Help";
        let hint_x = self.window_width as i32 - 16 - (hint.len() as f32 * char_width) as i32;
        self.renderer.draw_text(hint, hint_x, text_y, palette.muted_text, false, bar)
    }

    fn render_pane(&mut self, layout: &ProblemLayout, kind: PaneKind, palette: &Palette) -> Result<()> {
        let rect = layout.pane_rect(kind);
        self.renderer.fill_rect(rect, palette.pane)?;

        let header_height = self.manager.header_height().min(rect.height);
        let header = Rect::new(rect.x, rect.y, rect.width, header_height);
        self.renderer.fill_rect(header, palette.header)?;

        let (char_width, cell_height) = self.renderer.cell_dimensions();
        let text_y = rect.y as i32 + ((header_height as f32 - cell_height) / 2.0).max(0.0) as i32;
        let pane = self.manager.pane(kind);
        let active = pane.active_tab();

        for (i, tab_rect) in pane.tab_rects(rect, header_height, char_width).into_iter().enumerate() {
            let is_active = i == active;
            if is_active {
                self.renderer.fill_rect(tab_rect, palette.active_tab)?;
                let underline = Rect::new(tab_rect.x, tab_rect.y + header_height.saturating_sub(2), tab_rect.width, 2);
                self.renderer.fill_rect(underline, palette.accent)?;
            }

            let color = if is_active { palette.text } else { palette.muted_text };
            let text_x = (tab_rect.x + crate::pane::pane::TAB_PADDING) as i32;
            self.renderer.draw_text(kind.tabs()[i], text_x, text_y, color, is_active, tab_rect)?;
        }

        if kind == self.manager.focused() {
            self.renderer.draw_border(rect, 1, palette.accent.with_alpha(96))?;
        }

        // Pane contents are supplied by their own views; show what is selected
        let body = Rect::new(rect.x, rect.y + header_height, rect.width, rect.height - header_height);
        let label = match kind {
            PaneKind::Details => format!("{} / {}", self.problem_slug, pane.active_tab_label()),
            _ => pane.active_tab_label().to_string(),
        };
        let body_y = body.y as i32 + (cell_height * 1.5) as i32;
        self.renderer.draw_text(&label, body.x as i32 + 16, body_y, palette.text, false, body)?;

        let width_label = format!("{} px", rect.width);
        let width_y = body_y + (cell_height * 1.5) as i32;
        self.renderer
            .draw_text(&width_label, body.x as i32 + 16, width_y, palette.muted_text, false, body)
    }

    fn render_dividers(&mut self, layout: &ProblemLayout, palette: &Palette) -> Result<()> {
        let dragging = self.manager.dragging();

        for (divider, rect) in layout.dividers {
            let color = if dragging == Some(divider) {
                palette.divider_active
            } else {
                palette.divider
            };
            self.renderer.fill_rect(rect, color)?;
        }

        Ok(())
    }

    fn render_help_overlay(&mut self, palette: &Palette) -> Result<()> {
        let help_text = [
            "=== OpenAlgorithms Workbench ===",
            "",
            "Layout:",
            "  Drag divider      Resize panes",
            "  Ctrl+Alt+Right    Widen focused pane",
            "  Ctrl+Alt+Left     Narrow focused pane",
            "  Ctrl+Shift+R      Reset to even split",
            "",
            "Tabs:",
            "  Click tab         Switch tab",
            "  Ctrl+Tab          Next tab",
            "  Ctrl+Shift+Tab    Previous tab",
            "",
            "Appearance:",
            "  Ctrl+Shift+T      Toggle dark/light",
            "  Ctrl++ / Ctrl+-   Font size",
            "",
            "  F1 / ESC          Close help",
        ];

        let (cell_width, cell_height) = self.renderer.cell_dimensions();
        let max_line_width = help_text.iter().map(|s| s.len()).max().unwrap_or(0);
        let overlay_width = ((max_line_width as f32 + 4.0) * cell_width) as u32;
        let overlay_height = ((help_text.len() as f32 + 2.0) * cell_height) as u32;

        // Center the overlay
        let overlay_x = self.window_width.saturating_sub(overlay_width) / 2;
        let overlay_y = self.window_height.saturating_sub(overlay_height) / 2;
        let overlay = Rect::new(overlay_x, overlay_y, overlay_width, overlay_height);

        self.renderer.fill_rect(
            Rect::new(0, 0, self.window_width, self.window_height),
            Color::new(0, 0, 0, 96),
        )?;
        self.renderer.fill_rect(overlay, palette.overlay)?;
        self.renderer.draw_border(overlay, 3, palette.accent)?;

        let text_x = overlay_x as i32 + (2.0 * cell_width) as i32;
        let mut text_y = overlay_y as i32 + cell_height as i32;
        for line in help_text {
            self.renderer.draw_text(line, text_x, text_y, palette.text, false, overlay)?;
            text_y += cell_height as i32;
        }

        Ok(())
    }

    /// Get the base window title
    pub fn base_title(&self) -> String {
        format!("{} - {}", self.config.window.title, self.problem_slug)
    }
}
