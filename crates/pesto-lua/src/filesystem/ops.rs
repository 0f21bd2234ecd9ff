//! Filesystem calls with the script-facing failure policy applied.
//!
//! - queries (`exists`, `is_file`, ...) return the boolean directly
//! - mutations return `false` on failure and log a warning, except for the
//!   expected cases (creating an existing directory, removing a missing path)
//!   which stay silent
//! - reads return `None` on failure
//!
//! Paths are raw bytes on the script side; [`path_from_bytes`] and
//! [`path_to_bytes`] convert without loss on unix. No function here panics or
//! returns an `io::Error`.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use super::pattern::Filter;

/// Script string to native path.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

/// Script string to native path. Invalid UTF-8 is replaced.
#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Native path to script string.
#[cfg(unix)]
pub fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

pub fn change_directory(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match std::env::set_current_dir(path) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("changeDirectory({}) failed: {e}", path.display());
            false
        }
    }
}

/// Creates one directory level; the parent must exist.
pub fn create_directory(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match fs::create_dir(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => false,
        Err(e) => {
            log::warn!("failed to create directory {}: {e}", path.display());
            false
        }
    }
}

/// Removes a file or an empty directory.
pub fn remove(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return false,
        Err(e) => {
            log::warn!("failed to remove {}: {e}", path.display());
            return false;
        }
    };

    let result = if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to remove {}: {e}", path.display());
            false
        }
    }
}

/// A regular file or a directory. Devices, sockets and FIFOs do not count.
pub fn exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    is_file(path) || is_directory(path)
}

pub fn is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

pub fn is_directory(path: impl AsRef<Path>) -> bool {
    let p = path.as_ref();
    !p.is_file() && p.is_dir()
}

/// Size in bytes; `0` when the path cannot be inspected.
pub fn size(path: impl AsRef<Path>) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Modification time in unix seconds; `0` when unavailable.
pub fn last_modified(path: impl AsRef<Path>) -> i64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Whole file contents as raw bytes.
pub fn read(path: impl AsRef<Path>) -> Option<Vec<u8>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            None
        }
    }
}

/// Replaces the file contents, creating the file if needed.
pub fn write(path: impl AsRef<Path>, contents: &[u8]) -> bool {
    let path = path.as_ref();
    match fs::write(path, contents) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to write {}: {e}", path.display());
            false
        }
    }
}

/// Lists entries under `base` that pass `filter`.
///
/// Paths are `base` joined with the entry's relative path, sorted by file name
/// within each directory. `recurse` descends into every subdirectory whether or
/// not the directory itself is admitted. Returns `None` when nothing matched or
/// `base` is not a readable directory.
pub fn directory_items(base: impl AsRef<Path>, filter: &str, recurse: bool) -> Option<Vec<PathBuf>> {
    let base = base.as_ref();
    if !base.is_dir() {
        log::warn!("cannot list {}: not a directory", base.display());
        return None;
    }

    let filter = Filter::parse(filter);
    let mut walker = WalkDir::new(base).min_depth(1).sort_by_file_name();
    if !recurse {
        walker = walker.max_depth(1);
    }

    let mut items = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("skipping unreadable entry under {}: {e}", base.display());
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy();
        if filter.admits(&name, entry.file_type().is_dir()) {
            items.push(entry.into_path());
        }
    }

    if items.is_empty() { None } else { Some(items) }
}

/// Directory containing the running executable, with a trailing separator.
pub fn application_directory() -> String {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_string_lossy().into_owned()));

    match dir {
        Some(mut d) => {
            if !d.ends_with(MAIN_SEPARATOR) {
                d.push(MAIN_SEPARATOR);
            }
            d
        }
        None => {
            log::warn!("cannot determine the application directory");
            String::new()
        }
    }
}

/// Current working directory; empty when it cannot be determined.
pub fn working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

/// Directory part of `path`; `"."` when there is none.
pub fn real_directory(path: impl AsRef<Path>) -> PathBuf {
    match path.as_ref().parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> tempfile::TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn p(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    // ── read / write ──────────────────────────────────────────────────────

    #[test]
    fn write_then_read_returns_bytes() {
        let dir = scratch();
        let f = p(&dir, "data.bin");
        assert!(write(&f, b"\x00hello\xff"));
        assert_eq!(read(&f).as_deref(), Some(&b"\x00hello\xff"[..]));
        assert_eq!(size(&f), 7);
    }

    #[test]
    fn read_missing_is_none() {
        let dir = scratch();
        assert_eq!(read(&p(&dir, "nope.txt")), None);
    }

    #[test]
    fn write_into_missing_dir_fails() {
        let dir = scratch();
        assert!(!write(&p(&dir, "no/such/file.txt"), b"x"));
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn exists_is_file_or_directory() {
        let dir = scratch();
        let f = p(&dir, "f.txt");
        write(&f, b"1");
        let d = dir.path().to_path_buf();
        let missing = p(&dir, "missing");

        for path in [&f, &d, &missing] {
            assert_eq!(exists(path), is_file(path) || is_directory(path), "{}", path.display());
        }
        assert!(is_file(&f) && !is_directory(&f));
        assert!(is_directory(&d) && !is_file(&d));
        assert!(!exists(&missing));
    }

    #[cfg(unix)]
    #[test]
    fn device_node_is_neither_file_nor_directory() {
        let dev = Path::new("/dev/null");
        assert!(!is_file(dev));
        assert!(!is_directory(dev));
        assert!(!exists(dev));
    }

    #[test]
    fn missing_path_has_zero_size_and_mtime() {
        let dir = scratch();
        let m = p(&dir, "missing");
        assert_eq!(size(&m), 0);
        assert_eq!(last_modified(&m), 0);
    }

    #[test]
    fn fresh_file_has_recent_mtime() {
        let dir = scratch();
        let f = p(&dir, "t.txt");
        write(&f, b"x");
        assert!(last_modified(&f) > 1_600_000_000);
    }

    // ── create / remove ───────────────────────────────────────────────────

    #[test]
    fn create_directory_reports_creation_only() {
        let dir = scratch();
        let d = p(&dir, "sub");
        assert!(create_directory(&d));
        assert!(!create_directory(&d));
        assert!(is_directory(&d));
    }

    #[test]
    fn create_directory_with_missing_parent_is_false() {
        let dir = scratch();
        assert!(!create_directory(&p(&dir, "a/b/c")));
    }

    #[test]
    fn remove_file_and_empty_dir() {
        let dir = scratch();
        let f = p(&dir, "f");
        let d = p(&dir, "d");
        write(&f, b"");
        create_directory(&d);

        assert!(remove(&f));
        assert!(remove(&d));
        assert!(!exists(&f) && !exists(&d));
        assert!(!remove(&f));
    }

    #[test]
    fn remove_non_empty_dir_fails() {
        let dir = scratch();
        let d = p(&dir, "d");
        create_directory(&d);
        write(&p(&dir, "d/inner"), b"x");
        assert!(!remove(&d));
        assert!(exists(&d));
    }

    // ── listing ───────────────────────────────────────────────────────────

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = scratch();
        let base = dir.path();
        for name in ["b.png", "a.png", "c.txt"] {
            write(&p(&dir, name), b"");
        }
        create_directory(&p(&dir, "sub"));
        write(&p(&dir, "sub/d.png"), b"");

        let all = directory_items(&base, "*", false).expect("entries");
        assert_eq!(all.len(), 4);

        let pngs = directory_items(&base, ".png", false).expect("pngs");
        assert_eq!(pngs, vec![p(&dir, "a.png"), p(&dir, "b.png")]);

        let deep = directory_items(&base, ".png", true).expect("deep pngs");
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&p(&dir, "sub/d.png")));

        let dirs = directory_items(&base, "DIR", true).expect("dirs");
        assert_eq!(dirs, vec![p(&dir, "sub")]);
    }

    // macOS filesystems reject names that are not UTF-8.
    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_survive_listing() {
        let dir = scratch();
        let name = path_from_bytes(b"caf\xe9.txt");
        let f = dir.path().join(&name);
        assert!(write(&f, b"x"));

        let items = directory_items(dir.path(), "", false).expect("entries");
        assert_eq!(items, vec![f.clone()]);
        assert!(exists(&items[0]));
        assert_eq!(path_from_bytes(&path_to_bytes(&items[0])), f);
    }

    #[test]
    fn empty_directory_lists_as_none() {
        let dir = scratch();
        assert_eq!(directory_items(dir.path(), "", false), None);
    }

    #[test]
    fn listing_a_file_is_none() {
        let dir = scratch();
        let f = p(&dir, "f");
        write(&f, b"");
        assert_eq!(directory_items(&f, "", false), None);
    }

    // ── paths ─────────────────────────────────────────────────────────────

    #[test]
    fn real_directory_of_bare_name_is_dot() {
        assert_eq!(real_directory("file.txt"), Path::new("."));
        assert_eq!(real_directory("assets/img/a.png"), Path::new("assets/img"));
    }

    #[test]
    fn application_directory_ends_with_separator() {
        let dir = application_directory();
        assert!(dir.ends_with(MAIN_SEPARATOR), "{dir}");
    }
}
