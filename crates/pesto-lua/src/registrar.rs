use std::cell::{Ref, RefCell};
use std::rc::Rc;

use mlua::{Lua, Table, Value};

use pesto_engine::host::SharedHost;
use pesto_engine::text::Font;

use crate::error::BridgeError;
use crate::filesystem;
use crate::graphics::{self, DrawState};

const NAMESPACE: &str = "pesto";

/// Installed `pesto` namespace.
///
/// Holds the draw state the graphics bindings share, so the runner can hand
/// it a font or reset it between scripts.
pub struct Bridge {
    state: Rc<RefCell<DrawState>>,
}

impl Bridge {
    /// Installs `pesto.filesystem` and `pesto.graphics` into `lua`.
    ///
    /// The `pesto` global is reused when the script environment already has
    /// one. Installing twice into the same state fails and leaves the existing
    /// namespace untouched.
    pub fn install(lua: &Lua, host: SharedHost) -> Result<Self, BridgeError> {
        let globals = lua.globals();
        let ns = match globals.get::<Value>(NAMESPACE)? {
            Value::Table(t) => t,
            Value::Nil => {
                let t = lua.create_table()?;
                globals.set(NAMESPACE, t.clone())?;
                t
            }
            other => {
                return Err(BridgeError::Lua(mlua::Error::runtime(format!(
                    "global '{NAMESPACE}' is a {}, expected a table",
                    other.type_name()
                ))))
            }
        };

        if has_field(&ns, "graphics")? || has_field(&ns, "filesystem")? {
            return Err(BridgeError::AlreadyInstalled);
        }

        let state = Rc::new(RefCell::new(DrawState::new()));
        let fs = filesystem::create_table(lua, host.clone())?;
        let gfx = graphics::create_table(lua, host, state.clone())?;
        ns.set("filesystem", fs)?;
        ns.set("graphics", gfx)?;

        log::debug!("pesto bridge installed");
        Ok(Self { state })
    }

    /// Font used by `text` and `wrappedText`. `None` disables text.
    pub fn set_font(&self, font: Option<Font>) {
        self.state.borrow_mut().set_font(font);
    }

    pub fn draw_state(&self) -> Ref<'_, DrawState> {
        self.state.borrow()
    }

    /// Drops any half-recorded frame, e.g. after a script error.
    pub fn reset(&self) {
        self.state.borrow_mut().reset();
    }
}

fn has_field(table: &Table, key: &str) -> mlua::Result<bool> {
    Ok(!table.get::<Value>(key)?.is_nil())
}
