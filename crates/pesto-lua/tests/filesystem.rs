use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Lua, Table};
use pesto_engine::host::HostState;
use pesto_lua::Bridge;

fn setup() -> (Lua, Rc<RefCell<HostState>>, tempfile::TempDir) {
    let lua = Lua::new();
    let host = HostState::shared();
    Bridge::install(&lua, host.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    lua.globals()
        .set("dir", dir.path().to_string_lossy().into_owned())
        .unwrap();
    (lua, host, dir)
}

// ── files ─────────────────────────────────────────────────────────────────

#[test]
fn write_read_remove_exists() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local f = dir .. "/notes.txt"

        assert(fs.write(f, "hello\0world") == true)
        assert(fs.exists(f))
        assert(fs.isFile(f))
        assert(not fs.isDirectory(f))
        assert(fs.read(f) == "hello\0world")
        assert(fs.getSize(f) == 11)
        assert(fs.getLastModified(f) > 0)

        assert(fs.remove(f) == true)
        assert(not fs.exists(f))
        assert(fs.read(f) == nil)
        assert(fs.remove(f) == false)
        "#,
    )
    .exec()
    .unwrap();
}

#[test]
fn missing_paths_degrade_without_raising() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local missing = dir .. "/nope/deeper"

        assert(fs.getSize(missing) == 0)
        assert(fs.getLastModified(missing) == 0)
        assert(fs.createDirectory(missing) == false)
        assert(not fs.exists(missing))
        assert(fs.changeDirectory(missing) == false)
        assert(fs.write(missing .. "/f.txt", "x") == false)
        "#,
    )
    .exec()
    .unwrap();
}

#[test]
fn exists_is_file_or_directory() {
    let (lua, _host, dir) = setup();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    let check: bool = lua
        .load(
            r#"
            local fs = pesto.filesystem
            for _, name in ipairs({ "a.txt", "sub", "none" }) do
                local p = dir .. "/" .. name
                if fs.exists(p) ~= (fs.isFile(p) or fs.isDirectory(p)) then
                    return false
                end
            end
            return true
            "#,
        )
        .eval()
        .unwrap();
    assert!(check);
}

#[test]
fn non_utf8_paths_soft_fail() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local bad = dir .. "/\xff\xfe"
        assert(fs.changeDirectory(bad) == false)
        assert(fs.exists(bad) == false)
        assert(fs.isFile(bad) == false)
        assert(fs.read(bad) == nil)
        assert(fs.getSize(bad) == 0)
        assert(fs.getRealDirectory(bad) == dir)
        "#,
    )
    .exec()
    .unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_names_round_trip_through_listing() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local name = dir .. "/caf\xe9.txt"
        assert(fs.write(name, "x"))
        local items = fs.getDirectoryItems(dir, "", false)
        assert(#items == 1)
        assert(items[1] == name)
        assert(fs.exists(items[1]))
        assert(fs.read(items[1]) == "x")
        "#,
    )
    .exec()
    .unwrap();
}

#[cfg(unix)]
#[test]
fn device_node_does_not_exist_as_file_or_directory() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local p = "/dev/null"
        assert(fs.exists(p) == (fs.isFile(p) or fs.isDirectory(p)))
        assert(fs.exists(p) == false)
        "#,
    )
    .exec()
    .unwrap();
}

// ── directories ───────────────────────────────────────────────────────────

#[test]
fn empty_directory_lists_as_nil() {
    let (lua, _host, _dir) = setup();
    let items: Option<Table> = lua
        .load(r#"return pesto.filesystem.getDirectoryItems(dir, "*", false)"#)
        .eval()
        .unwrap();
    assert!(items.is_none());
}

#[test]
fn directory_items_filter_and_recurse() {
    let (lua, _host, dir) = setup();
    let root = dir.path();
    std::fs::write(root.join("b.png"), b"").unwrap();
    std::fs::write(root.join("a.PNG"), b"").unwrap();
    std::fs::write(root.join("c.txt"), b"").unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::write(root.join("sub").join("d.png"), b"").unwrap();

    let flat: Vec<String> = lua
        .load(r#"return pesto.filesystem.getDirectoryItems(dir, "*", false)"#)
        .eval()
        .unwrap();
    assert_eq!(flat.len(), 4);

    let pngs: Vec<String> = lua
        .load(r#"return pesto.filesystem.getDirectoryItems(dir, ".png", false)"#)
        .eval()
        .unwrap();
    let names: Vec<_> = pngs
        .iter()
        .map(|p| p.rsplit(['/', '\\']).next().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png"]);

    let deep: Vec<String> = lua
        .load(r#"return pesto.filesystem.getDirectoryItems(dir, ".png", true)"#)
        .eval()
        .unwrap();
    assert_eq!(deep.len(), 3);
    assert!(deep.iter().any(|p| p.ends_with("d.png")));
}

#[test]
fn create_directory_twice() {
    let (lua, _host, _dir) = setup();
    lua.load(
        r#"
        local fs = pesto.filesystem
        local d = dir .. "/made"
        assert(fs.createDirectory(d) == true)
        assert(fs.isDirectory(d))
        assert(fs.createDirectory(d) == false)
        "#,
    )
    .exec()
    .unwrap();
}

#[test]
fn real_directory_of_bare_name_is_dot() {
    let (lua, _host, _dir) = setup();
    let real: String = lua
        .load(r#"return pesto.filesystem.getRealDirectory("file.txt")"#)
        .eval()
        .unwrap();
    assert_eq!(real, ".");
}

// ── dropped files ─────────────────────────────────────────────────────────

#[test]
fn dropped_items_drain_once() {
    let (lua, host, _dir) = setup();
    host.borrow_mut().push_dropped_file("/tmp/one.png");
    host.borrow_mut().push_dropped_file("/tmp/two.png");

    lua.load(
        r#"
        local fs = pesto.filesystem
        assert(fs.isFileDropped())
        local items = fs.getDroppedItems()
        assert(#items == 2)
        assert(items[1] == "/tmp/one.png")
        assert(items[2] == "/tmp/two.png")
        assert(not fs.isFileDropped())
        assert(fs.getDroppedItems() == nil)
        "#,
    )
    .exec()
    .unwrap();
}
