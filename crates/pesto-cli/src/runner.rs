//! Drives a script through the windowed runtime.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use mlua::{Function, Lua, Table};
use winit::event::WindowEvent;
use winit::window::WindowId;

use pesto_engine::core::{App, AppControl, FrameCtx};
use pesto_engine::host::HostState;
use pesto_engine::render::Renderer;
use pesto_engine::text::{Font, FontSystem};
use pesto_lua::Bridge;

/// Fonts tried when no `--font` is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub script: PathBuf,
    pub font: Option<PathBuf>,
    pub font_size: f32,
}

/// One script, its Lua state and everything the frames need to render it.
pub struct ScriptApp {
    lua: Lua,
    bridge: Bridge,
    host: Rc<RefCell<HostState>>,
    fonts: FontSystem,
    renderer: Renderer,
    failed: Rc<Cell<bool>>,
}

impl ScriptApp {
    /// Installs the bridge, runs the script's top level and its `pesto.load`.
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let source = std::fs::read_to_string(&config.script)
            .with_context(|| format!("failed to read {}", config.script.display()))?;

        let lua = Lua::new();
        let host = HostState::shared();
        let bridge = Bridge::install(&lua, host.clone())
            .map_err(|e| anyhow::anyhow!("failed to install pesto: {e}"))?;

        let mut fonts = FontSystem::new();
        let font = load_font(&mut fonts, &config);
        bridge.set_font(font);

        lua.load(source.as_str())
            .set_name(format!("@{}", config.script.display()))
            .exec()
            .map_err(|e| anyhow::anyhow!("error running {}: {e}", config.script.display()))?;

        let app = Self {
            lua,
            bridge,
            host,
            fonts,
            renderer: Renderer::new(),
            failed: Rc::new(Cell::new(false)),
        };
        app.call("load", ())
            .map_err(|e| anyhow::anyhow!("error in pesto.load: {e}"))?;
        Ok(app)
    }

    /// Set once a callback raised; the runtime has been asked to exit.
    pub fn failure_flag(&self) -> Rc<Cell<bool>> {
        self.failed.clone()
    }

    /// Calls `pesto.<name>` if the script defined it.
    fn call(&self, name: &str, args: impl mlua::IntoLuaMulti) -> mlua::Result<()> {
        let Ok(ns) = self.lua.globals().get::<Table>("pesto") else {
            return Ok(());
        };
        match ns.get::<Option<Function>>(name)? {
            Some(f) => f.call::<()>(args),
            None => Ok(()),
        }
    }

    /// One script frame: `update(dt)` then `draw()`.
    fn step(&mut self, dt: f32) -> mlua::Result<()> {
        self.host.borrow_mut().set_frame_time(dt);
        self.call("update", dt as f64)?;
        self.call("draw", ())
    }
}

fn load_font(fonts: &mut FontSystem, config: &RunnerConfig) -> Option<Font> {
    let id = match &config.font {
        Some(path) => match fonts.load_font_file(path) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("failed to load font {}: {e}", path.display());
                None
            }
        },
        None => SYSTEM_FONTS
            .iter()
            .find_map(|p| std::fs::read(p).ok())
            .and_then(|bytes| fonts.load_font(&bytes).ok()),
    };

    if id.is_none() {
        log::warn!("no font available; graphics.text draws nothing");
    }
    id.map(|id| Font::new(id, config.font_size))
}

impl App for ScriptApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::DroppedFile(path) = event {
            log::debug!("file dropped: {}", path.display());
            self.host
                .borrow_mut()
                .push_dropped_file(path.to_string_lossy().into_owned());
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(e) = self.step(ctx.time.dt) {
            log::error!("script error: {e}");
            self.bridge.reset();
            self.failed.set(true);
            return AppControl::Exit;
        }

        let lists = self.host.borrow_mut().take_submitted();
        let (renderer, fonts, host) = (&mut self.renderer, &self.fonts, &self.host);
        let control = ctx.render(|rctx, target| {
            renderer.sync_resources(rctx, host.borrow_mut().resources_mut());
            renderer.render(rctx, target, &lists, fonts);
        });

        // Submitted: nothing recorded this frame samples a released texture.
        let freed = self.host.borrow_mut().resources_mut().collect_garbage();
        self.renderer.release(&freed);
        control
    }
}
