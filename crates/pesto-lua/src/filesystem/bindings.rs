use std::path::{Path, PathBuf};

use mlua::{Lua, Table};

use pesto_engine::host::SharedHost;

use super::ops;

/// Lua strings are bytes; paths keep them as-is so no argument can fail to
/// convert.
fn arg_path(s: &mlua::String) -> PathBuf {
    ops::path_from_bytes(&s.as_bytes())
}

fn lua_path(lua: &Lua, path: &Path) -> mlua::Result<mlua::String> {
    lua.create_string(ops::path_to_bytes(path))
}

/// Builds the `pesto.filesystem` table.
///
/// The drop-queue functions read from `host`; everything else is stateless.
pub(crate) fn create_table(lua: &Lua, host: SharedHost) -> mlua::Result<Table> {
    let fs = lua.create_table()?;

    fs.set(
        "changeDirectory",
        lua.create_function(|_, path: mlua::String| Ok(ops::change_directory(arg_path(&path))))?,
    )?;
    fs.set(
        "createDirectory",
        lua.create_function(|_, path: mlua::String| Ok(ops::create_directory(arg_path(&path))))?,
    )?;
    fs.set(
        "remove",
        lua.create_function(|_, path: mlua::String| Ok(ops::remove(arg_path(&path))))?,
    )?;
    fs.set(
        "exists",
        lua.create_function(|_, path: mlua::String| Ok(ops::exists(arg_path(&path))))?,
    )?;
    fs.set(
        "isFile",
        lua.create_function(|_, path: mlua::String| Ok(ops::is_file(arg_path(&path))))?,
    )?;
    fs.set(
        "isDirectory",
        lua.create_function(|_, path: mlua::String| Ok(ops::is_directory(arg_path(&path))))?,
    )?;
    fs.set(
        "getSize",
        lua.create_function(|_, path: mlua::String| Ok(ops::size(arg_path(&path)) as i64))?,
    )?;
    fs.set(
        "getLastModified",
        lua.create_function(|_, path: mlua::String| Ok(ops::last_modified(arg_path(&path))))?,
    )?;

    // Contents are bytes; Lua strings carry them unchanged.
    fs.set(
        "read",
        lua.create_function(|lua, path: mlua::String| match ops::read(arg_path(&path)) {
            Some(bytes) => Ok(Some(lua.create_string(bytes)?)),
            None => Ok(None),
        })?,
    )?;
    fs.set(
        "write",
        lua.create_function(|_, (path, contents): (mlua::String, mlua::String)| {
            Ok(ops::write(arg_path(&path), &contents.as_bytes()))
        })?,
    )?;

    fs.set(
        "getDirectoryItems",
        lua.create_function(
            |lua, (base, filter, recurse): (mlua::String, Option<mlua::String>, Option<bool>)| {
                let filter = filter.map(|f| f.to_string_lossy()).unwrap_or_default();
                let Some(items) =
                    ops::directory_items(arg_path(&base), &filter, recurse.unwrap_or(false))
                else {
                    return Ok(None);
                };
                let seq = lua.create_table_with_capacity(items.len(), 0)?;
                for item in &items {
                    seq.raw_push(lua_path(lua, item)?)?;
                }
                Ok(Some(seq))
            },
        )?,
    )?;

    let h = host.clone();
    fs.set(
        "getDroppedItems",
        lua.create_function(move |lua, ()| {
            // Release the host before allocating: allocation may run finalizers.
            let dropped = h.borrow_mut().take_dropped_files();
            if dropped.is_empty() {
                return Ok(None);
            }
            Ok(Some(lua.create_sequence_from(dropped)?))
        })?,
    )?;

    let h = host;
    fs.set(
        "isFileDropped",
        lua.create_function(move |_, ()| Ok(h.borrow().is_file_dropped()))?,
    )?;

    fs.set(
        "getApplicationDirectory",
        lua.create_function(|_, ()| Ok(ops::application_directory()))?,
    )?;
    fs.set(
        "getWorkingDirectory",
        lua.create_function(|lua, ()| lua_path(lua, &ops::working_directory()))?,
    )?;
    fs.set(
        "getRealDirectory",
        lua.create_function(|lua, path: mlua::String| {
            lua_path(lua, &ops::real_directory(arg_path(&path)))
        })?,
    )?;

    Ok(fs)
}
