use std::io;
use std::path::Path;

/// Creates the parent directory of `path`, and any missing ancestors.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
