//! Path resolution against the shell's current directory.

use heapless::{String, Vec};

use super::Error;

/// Longest absolute path the shell handles, in bytes.
pub const MAX_PATH_LEN: usize = 128;

/// Deepest directory nesting [`resolve`] accepts.
const MAX_DEPTH: usize = 16;

/// Owned absolute path.
pub type Path = String<MAX_PATH_LEN>;

/// Resolve `input` against `cwd` into a normalized absolute path.
///
/// Absolute inputs ignore `cwd`. Empty components and `.` are dropped and
/// `..` climbs one level (never above `/`).
///
/// ```text
/// resolve("/lib", "sensors.txt")   -> "/lib/sensors.txt"
/// resolve("/lib", "../boot.py")    -> "/boot.py"
/// resolve("/lib", "/data//x/./y")  -> "/data/x/y"
/// ```
pub fn resolve(cwd: &str, input: &str) -> Result<Path, Error> {
    let mut parts: Vec<&str, MAX_DEPTH> = Vec::new();

    let base = if input.starts_with('/') { "" } else { cwd };
    for component in base.split('/').chain(input.split('/')) {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name).map_err(|_| Error::PathTooLong)?,
        }
    }

    let mut path = Path::new();
    if parts.is_empty() {
        path.push('/').map_err(|_| Error::PathTooLong)?;
    }
    for part in &parts {
        path.push('/').map_err(|_| Error::PathTooLong)?;
        path.push_str(part).map_err(|_| Error::PathTooLong)?;
    }
    Ok(path)
}

/// Last component of a path (`"/a/b.txt"` gives `"b.txt"`).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
