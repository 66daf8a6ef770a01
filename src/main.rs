mod app;
mod config;
mod input;
mod pane;
mod renderer;
mod storage;
mod utils;

use anyhow::Context;
use app::App;
use clap::Parser;
use config::{Config, init_config};
use std::path::PathBuf;
use std::sync::Arc;
use storage::{FileSessionStorage, MemoryStorage, SessionStorage};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// OpenAlgorithms Workbench - resizable problem-solving view
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (default: ~/.config/openalgo-workbench/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Problem slug shown in the details pane
    #[arg(short, long, default_value = "two-sum")]
    problem: String,

    /// Session identifier for persisted layout (default: $XDG_SESSION_ID)
    #[arg(long, value_name = "ID")]
    session: Option<String>,

    /// Keep pane ratios in memory only
    #[arg(long)]
    no_persist: bool,

    /// Discard the persisted layout and start from an even split
    #[arg(long)]
    reset_layout: bool,
}

struct WorkbenchApp {
    window: Option<Arc<Window>>,
    app: Option<App>,
    args: Args,
    modifiers: winit::keyboard::ModifiersState,
    cursor_position: (f64, f64),
}

impl WorkbenchApp {
    fn open_storage(&self, config: &Config) -> Box<dyn SessionStorage> {
        if self.args.no_persist || !config.session.persist {
            log::info!("Layout persistence disabled, keeping pane ratios in memory");
            return Box::new(MemoryStorage::new());
        }

        let session_id = self.args.session.clone().or_else(|| config.session.session_id.clone());
        match FileSessionStorage::from_env(config.session.storage_dir.clone(), session_id) {
            Ok(storage) => {
                log::info!("Persisting layout under {}", storage.dir().display());
                Box::new(storage)
            }
            Err(e) => {
                log::warn!("Session storage unavailable ({}), keeping pane ratios in memory", e);
                Box::new(MemoryStorage::new())
            }
        }
    }
}

impl ApplicationHandler for WorkbenchApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Load config
        let config = match init_config(self.args.config.clone()) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Failed to load config: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Create window
        let mut window_attrs = Window::default_attributes().with_title(&config.window.title);

        // Set window size or maximize
        if config.window.maximize {
            window_attrs = window_attrs.with_maximized(true);
            log::info!("Creating maximized window");
        } else {
            window_attrs = window_attrs.with_inner_size(winit::dpi::PhysicalSize::new(
                config.window.width,
                config.window.height,
            ));
            log::info!("Creating window with size {}x{}", config.window.width, config.window.height);
        }

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let storage = self.open_storage(&config);
        let app = match App::new(
            config,
            window.clone(),
            storage,
            self.args.problem.clone(),
            self.args.reset_layout,
        ) {
            Ok(a) => a,
            Err(e) => {
                log::error!("Failed to create app: {}", e);
                event_loop.exit();
                return;
            }
        };

        window.set_title(&app.base_title());
        window.request_redraw();

        self.window = Some(window);
        self.app = Some(app);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };

        let Some(window) = &self.window else {
            return;
        };

        let needs_redraw = match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
                false
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = app.resize(size.width, size.height) {
                    log::error!("Failed to resize: {}", e);
                }
                true
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = app.render() {
                    log::error!("Failed to render: {}", e);
                }
                false
            }

            WindowEvent::Focused(false) => app.handle_focus_lost(),

            WindowEvent::ThemeChanged(theme) => app.set_system_theme(theme),

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                false
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match app.handle_keyboard_input(&event.physical_key, self.modifiers) {
                    Ok(handled) => handled,
                    Err(e) => {
                        log::error!("Failed to handle keyboard input: {}", e);
                        false
                    }
                }
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let (x, y) = self.cursor_position;
                let result = match state {
                    ElementState::Pressed => app.handle_mouse_press(x, y),
                    ElementState::Released => app.handle_mouse_release(x, y),
                };
                result.unwrap_or_else(|e| {
                    log::error!("Failed to handle mouse input: {}", e);
                    false
                })
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
                app.handle_mouse_move(position.x, position.y).unwrap_or_else(|e| {
                    log::error!("Failed to handle mouse move: {}", e);
                    false
                })
            }

            _ => false,
        };

        if needs_redraw {
            window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Everything is event driven; sleep until the next event
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting openalgo-workbench");
    if let Some(ref config_path) = args.config {
        log::info!("Using config file: {}", config_path.display());
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;

    let mut app = WorkbenchApp {
        window: None,
        app: None,
        args,
        modifiers: winit::keyboard::ModifiersState::empty(),
        cursor_position: (0.0, 0.0),
    };

    event_loop.run_app(&mut app).context("event loop error")?;

    log::info!("Exited cleanly");
    Ok(())
}
