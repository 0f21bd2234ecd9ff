//! Script-visible resource handles.

use mlua::{MetaMethod, UserData, UserDataMethods, Value};

use pesto_engine::resources::{ReleaseQueue, RenderTexture, Texture};

fn field_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.to_string_lossy()),
        _ => None,
    }
}

/// Lua `Image`: an uploaded texture owned by one userdata.
///
/// Dropping the handle (Lua collected it) queues the texture for release. The
/// queue is the only thing touched here, so finalizers stay safe to run in the
/// middle of any binding.
#[derive(Debug)]
pub struct ImageHandle {
    texture: Texture,
    releases: ReleaseQueue,
}

impl ImageHandle {
    pub fn new(texture: Texture, releases: ReleaseQueue) -> Self {
        Self { texture, releases }
    }

    pub fn texture(&self) -> Texture {
        self.texture
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        self.releases.push(self.texture.id);
    }
}

impl UserData for ImageHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Index, |_, this, key: Value| {
            let t = &this.texture;
            let v = match field_name(&key).as_deref() {
                Some("width") => t.width as i64,
                Some("height") => t.height as i64,
                Some("mipmaps") => t.mipmaps as i64,
                Some("format") => t.format.code(),
                Some("id") => t.id.raw() as i64,
                _ => return Ok(Value::Nil),
            };
            Ok(Value::Integer(v))
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!(
                "Image({}, {}x{})",
                this.texture.id.raw(),
                this.texture.width,
                this.texture.height
            ))
        });
    }
}

/// Lua `RenderTexture`: an offscreen target.
///
/// Targets live until the host shuts down, so no release hook is attached and
/// a target on the draw state's stack can never dangle.
#[derive(Debug, Clone, Copy)]
pub struct RenderTargetHandle {
    target: RenderTexture,
}

impl RenderTargetHandle {
    pub fn new(target: RenderTexture) -> Self {
        Self { target }
    }

    pub fn target(&self) -> RenderTexture {
        self.target
    }
}

impl UserData for RenderTargetHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Index, |_, this, key: Value| {
            let rt = &this.target;
            let v = match field_name(&key).as_deref() {
                Some("width") => rt.width as i64,
                Some("height") => rt.height as i64,
                Some("id") => rt.id.raw() as i64,
                Some("texture") => rt.texture.id.raw() as i64,
                _ => return Ok(Value::Nil),
            };
            Ok(Value::Integer(v))
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!(
                "RenderTexture({}, {}x{})",
                this.target.id.raw(),
                this.target.width,
                this.target.height
            ))
        });
    }
}
