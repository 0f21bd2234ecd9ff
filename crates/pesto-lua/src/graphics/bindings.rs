use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::{Lua, Table, UserDataRef};

use pesto_engine::coords::{Rect, Vec2};
use pesto_engine::host::SharedHost;
use pesto_engine::paint::Color;
use pesto_engine::resources::Texture;
use pesto_engine::scene::Style;

use super::DrawState;
use crate::handles::{ImageHandle, RenderTargetHandle};

type SharedState = Rc<RefCell<DrawState>>;

/// `drawPro` arguments after the handle: source rect, destination rect,
/// origin, rotation.
type ProArgs = (f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64);

fn pro_geometry(
    (sx, sy, sw, sh, dx, dy, dw, dh, ox, oy, rot): ProArgs,
) -> (Rect, Rect, Vec2, f32) {
    (
        Rect::new(sx as f32, sy as f32, sw as f32, sh as f32),
        Rect::new(dx as f32, dy as f32, dw as f32, dh as f32),
        Vec2::new(ox as f32, oy as f32),
        rot as f32,
    )
}

fn draw_pro(state: &SharedState, texture: Texture, args: ProArgs) -> mlua::Result<()> {
    let (src, dst, origin, rotation) = pro_geometry(args);
    state.borrow_mut().draw_pro(texture, src, dst, origin, rotation)?;
    Ok(())
}

/// Builds the `pesto.graphics` table.
///
/// Every closure takes its borrow of `state` or `host` for the duration of one
/// native call and releases it before any Lua value is created.
pub(crate) fn create_table(lua: &Lua, host: SharedHost, state: SharedState) -> mlua::Result<Table> {
    let gfx = lua.create_table()?;

    // ── ambient color ─────────────────────────────────────────────────────

    let s = state.clone();
    gfx.set(
        "setColor",
        lua.create_function(move |_, (r, g, b, a): (i64, i64, i64, Option<i64>)| {
            s.borrow_mut()
                .set_color(Color::from_channels(r, g, b, a.unwrap_or(255)));
            Ok(())
        })?,
    )?;
    let s = state.clone();
    gfx.set(
        "getColor",
        lua.create_function(move |_, ()| {
            let [r, g, b, a] = s.borrow().color().channels();
            Ok((r, g, b, a))
        })?,
    )?;

    // ── primitives ────────────────────────────────────────────────────────

    let s = state.clone();
    gfx.set(
        "clear",
        lua.create_function(move |_, (r, g, b, a): (i64, i64, i64, Option<i64>)| {
            s.borrow_mut()
                .clear(Color::from_channels(r, g, b, a.unwrap_or(255)))?;
            Ok(())
        })?,
    )?;
    let s = state.clone();
    gfx.set(
        "pixel",
        lua.create_function(move |_, (x, y): (i32, i32)| {
            s.borrow_mut().pixel(x, y)?;
            Ok(())
        })?,
    )?;
    let s = state.clone();
    gfx.set(
        "line",
        lua.create_function(move |_, (x1, y1, x2, y2): (i32, i32, i32, i32)| {
            s.borrow_mut().line(x1, y1, x2, y2)?;
            Ok(())
        })?,
    )?;

    for (name, style) in [("circle", Style::Fill), ("circleLines", Style::Outline)] {
        let s = state.clone();
        gfx.set(
            name,
            lua.create_function(move |_, (x, y, r): (i32, i32, f64)| {
                s.borrow_mut().circle(x, y, r as f32, style)?;
                Ok(())
            })?,
        )?;
    }
    for (name, style) in [("rectangle", Style::Fill), ("rectangleLines", Style::Outline)] {
        let s = state.clone();
        gfx.set(
            name,
            lua.create_function(move |_, (x, y, w, h): (i32, i32, i32, i32)| {
                s.borrow_mut().rectangle(x, y, w, h, style)?;
                Ok(())
            })?,
        )?;
    }
    for (name, style) in [("polygon", Style::Fill), ("polygonLines", Style::Outline)] {
        let s = state.clone();
        gfx.set(
            name,
            lua.create_function(
                move |_, (x, y, sides, r, rot): (i32, i32, i32, f64, Option<f64>)| {
                    s.borrow_mut()
                        .polygon(x, y, sides, r as f32, rot.unwrap_or(0.0) as f32, style)?;
                    Ok(())
                },
            )?,
        )?;
    }

    let s = state.clone();
    gfx.set(
        "text",
        lua.create_function(move |_, (text, x, y): (mlua::String, i32, i32)| {
            let text = text.to_string_lossy();
            s.borrow_mut().text(&text, x, y)?;
            Ok(())
        })?,
    )?;
    let s = state.clone();
    gfx.set(
        "wrappedText",
        lua.create_function(
            move |_, (text, x, y, w, h): (mlua::String, i32, i32, i32, i32)| {
                let text = text.to_string_lossy();
                s.borrow_mut().wrapped_text(&text, x, y, w, h)?;
                Ok(())
            },
        )?,
    )?;

    // ── images ────────────────────────────────────────────────────────────

    let h = host.clone();
    gfx.set(
        "load",
        lua.create_function(move |lua, path: String| {
            let handle = {
                let mut host = h.borrow_mut();
                let texture = host.load_texture(Path::new(&path));
                ImageHandle::new(texture, host.release_queue())
            };
            lua.create_userdata(handle)
        })?,
    )?;

    let s = state.clone();
    gfx.set(
        "draw",
        lua.create_function(move |_, (img, x, y): (UserDataRef<ImageHandle>, f64, f64)| {
            s.borrow_mut().draw(img.texture(), x as i32, y as i32)?;
            Ok(())
        })?,
    )?;

    let s = state.clone();
    gfx.set(
        "drawPro",
        lua.create_function(move |_, (img, args): (UserDataRef<ImageHandle>, ProArgs)| {
            draw_pro(&s, img.texture(), args)
        })?,
    )?;

    // ── render textures ───────────────────────────────────────────────────

    let h = host.clone();
    gfx.set(
        "loadRenderTexture",
        lua.create_function(move |lua, (w, hgt): (i64, i64)| {
            let dim = |v: i64| v.clamp(0, u32::MAX as i64) as u32;
            let target = h.borrow_mut().load_render_texture(dim(w), dim(hgt));
            lua.create_userdata(RenderTargetHandle::new(target))
        })?,
    )?;

    let s = state.clone();
    gfx.set(
        "beginTextureMode",
        lua.create_function(move |_, rt: UserDataRef<RenderTargetHandle>| {
            s.borrow_mut().begin_texture_mode(rt.target());
            Ok(())
        })?,
    )?;

    let s = state.clone();
    let h = host.clone();
    gfx.set(
        "endTextureMode",
        lua.create_function(move |_, ()| {
            let flushed = s.borrow_mut().end_texture_mode()?;
            if let Some(list) = flushed {
                h.borrow_mut().submit(list);
            }
            Ok(())
        })?,
    )?;

    let s = state.clone();
    gfx.set(
        "drawRenderTexturePro",
        lua.create_function(
            move |_, (rt, args): (UserDataRef<RenderTargetHandle>, ProArgs)| {
                draw_pro(&s, rt.target().texture, args)
            },
        )?,
    )?;

    // ── frame ─────────────────────────────────────────────────────────────

    let s = state.clone();
    gfx.set(
        "beginDrawing",
        lua.create_function(move |_, ()| {
            s.borrow_mut().begin_drawing()?;
            Ok(())
        })?,
    )?;

    let s = state;
    let h = host.clone();
    gfx.set(
        "endDrawing",
        lua.create_function(move |_, ()| {
            let list = s.borrow_mut().end_drawing()?;
            h.borrow_mut().submit(list);
            Ok(())
        })?,
    )?;

    let h = host;
    gfx.set(
        "getDelta",
        lua.create_function(move |_, ()| Ok(h.borrow().frame_time() as f64))?,
    )?;

    Ok(gfx)
}
