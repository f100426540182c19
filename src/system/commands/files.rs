//! Filesystem commands: `ls`, `cd`, `pwd`, `delete`, `mkdir`, `rmdir`, `cp`, `mv`, `cat`.

use core::fmt::{self, Write};
use core::str;

use heapless::{String, Vec};

use crate::fs::{self, DirEntry, Path};
use crate::system::{CommandResult, ShellContext, ShellError};

/// Largest file `cp` and `cat` handle, in bytes.
pub const MAX_FILE_SIZE: usize = 4096;

/// Entries `ls` sorts and prints; the rest are counted.
const MAX_LISTING: usize = 64;

/// Longest entry name `ls` prints before clipping.
const MAX_ENTRY_NAME: usize = 32;

struct Listed {
    dir: bool,
    name: String<MAX_ENTRY_NAME>,
    size: u32,
}

/// Decimal with thousands separators, e.g. `1,048,576`.
///
/// Honors width and alignment flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouped(pub u64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 20 digits and 6 separators
        let mut buf = [0u8; 26];
        let mut at = buf.len();
        let mut n = self.0;
        let mut digits = 0;
        loop {
            if digits > 0 && digits % 3 == 0 {
                at -= 1;
                buf[at] = b',';
            }
            at -= 1;
            buf[at] = b'0' + (n % 10) as u8;
            n /= 10;
            digits += 1;
            if n == 0 {
                break;
            }
        }
        f.pad(str::from_utf8(&buf[at..]).unwrap_or_default())
    }
}

fn exactly<'x, const N: usize>(
    args: &[&'x str],
    usage: &'static str,
) -> Result<[&'x str; N], ShellError> {
    <[&str; N]>::try_from(args).map_err(|_| ShellError::InvalidArgumentCount { usage })
}

/// Destination for `cp`/`mv`: an existing directory receives the source's name.
fn destination(ctx: &mut ShellContext<'_>, src: &Path, dst: &str) -> Result<Path, ShellError> {
    let dst = ctx.resolve(dst)?;
    match ctx.fs.metadata(&dst) {
        Ok(meta) if meta.is_dir() => fs::path::resolve(&dst, fs::path::file_name(src))
            .map_err(|err| ShellError::fs(&dst, err)),
        _ => Ok(dst),
    }
}

/// `ls [dir]`: directories first, then files, each sorted by name.
pub fn list(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let target = match args {
        [] => ctx.resolve(".")?,
        [dir] => ctx.resolve(dir)?,
        _ => return Err(ShellError::InvalidArgumentCount { usage: "ls [dir]" }),
    };

    let mut entries: Vec<Listed, MAX_LISTING> = Vec::new();
    let mut hidden = 0usize;
    ctx.fs
        .list_dir(&target, &mut |entry: DirEntry<'_>| {
            let mut name = String::new();
            for ch in entry.name.chars() {
                if name.push(ch).is_err() {
                    break;
                }
            }
            let listed = Listed {
                dir: entry.metadata.is_dir(),
                name,
                size: entry.metadata.size,
            };
            if entries.push(listed).is_err() {
                hidden += 1;
            }
        })
        .map_err(|err| ShellError::fs(&target, err))?;

    entries.sort_unstable_by(|a, b| b.dir.cmp(&a.dir).then_with(|| a.name.cmp(&b.name)));

    let out = &mut *ctx.console;
    let _ = writeln!(out, "\nContents of {}:", target);
    if entries.is_empty() && hidden == 0 {
        let _ = writeln!(out, "  (empty)");
    }
    for entry in &entries {
        if entry.dir {
            let _ = writeln!(out, "[DIR]  {}", entry.name);
        } else {
            let _ = writeln!(
                out,
                "[FILE] {:<24} {:>10} bytes",
                entry.name,
                Grouped(entry.size as u64)
            );
        }
    }
    if hidden > 0 {
        let _ = writeln!(out, "  ... and {} more", hidden);
    }
    Ok(())
}

/// `cd <dir>`
pub fn change_dir(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [dir] = exactly::<1>(args, "cd <dir>")?;
    let path = ctx.resolve(dir)?;
    let meta = ctx.fs.metadata(&path).map_err(|err| ShellError::fs(&path, err))?;
    if !meta.is_dir() {
        return Err(ShellError::fs(&path, fs::Error::NotADirectory));
    }
    ctx.set_cwd(path);
    Ok(())
}

/// `pwd`
pub fn print_dir(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    exactly::<0>(args, "pwd")?;
    let cwd = ctx.resolve(".")?;
    let _ = writeln!(ctx.console, "Current directory: {}", cwd);
    Ok(())
}

/// `delete <file>` / `del <file>`
pub fn delete(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [file] = exactly::<1>(args, "delete <file>")?;
    let path = ctx.resolve(file)?;
    let meta = ctx.fs.metadata(&path).map_err(|err| ShellError::fs(&path, err))?;
    if meta.is_dir() {
        return Err(ShellError::fs(&path, fs::Error::IsADirectory));
    }
    ctx.fs.remove_file(&path).map_err(|err| ShellError::fs(&path, err))?;
    let _ = writeln!(ctx.console, "File '{}' deleted.", file);
    Ok(())
}

/// `mkdir <dir>`
pub fn make_dir(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [dir] = exactly::<1>(args, "mkdir <dir>")?;
    let path = ctx.resolve(dir)?;
    ctx.fs.create_dir(&path).map_err(|err| ShellError::fs(&path, err))?;
    let _ = writeln!(ctx.console, "Directory '{}' created.", dir);
    Ok(())
}

/// `rmdir <dir>`: the directory must be empty.
pub fn remove_dir(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [dir] = exactly::<1>(args, "rmdir <dir>")?;
    let path = ctx.resolve(dir)?;
    ctx.fs.remove_dir(&path).map_err(|err| ShellError::fs(&path, err))?;
    let _ = writeln!(ctx.console, "Directory '{}' removed.", dir);
    Ok(())
}

/// `cp <src> <dst>`: copy, then read the copy back and compare CRC-32s.
pub fn copy(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [src, dst] = exactly::<2>(args, "cp <src> <dst>")?;
    let src = ctx.resolve(src)?;
    let dst = destination(ctx, &src, dst)?;

    let mut buf = [0u8; MAX_FILE_SIZE];
    let len = ctx.fs.read(&src, &mut buf).map_err(|err| ShellError::fs(&src, err))?;
    let expected = crc32fast::hash(&buf[..len]);
    ctx.fs
        .write(&dst, &buf[..len])
        .map_err(|err| ShellError::fs(&dst, err))?;

    let copied = ctx.fs.read(&dst, &mut buf).map_err(|err| ShellError::fs(&dst, err))?;
    if copied != len || crc32fast::hash(&buf[..copied]) != expected {
        log_error!("copy of {} read back corrupted", src.as_str());
        return Err(ShellError::VerifyFailed { path: dst });
    }

    let _ = writeln!(
        ctx.console,
        "Copied {} to {} ({} bytes)",
        src,
        dst,
        Grouped(len as u64)
    );
    Ok(())
}

/// `mv <src> <dst>`
pub fn rename(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [src, dst] = exactly::<2>(args, "mv <src> <dst>")?;
    let src = ctx.resolve(src)?;
    ctx.fs.metadata(&src).map_err(|err| ShellError::fs(&src, err))?;
    let dst = destination(ctx, &src, dst)?;
    ctx.fs.rename(&src, &dst).map_err(|err| ShellError::fs(&dst, err))?;
    let _ = writeln!(ctx.console, "Moved {} to {}", src, dst);
    Ok(())
}

/// `cat <file>`
pub fn cat(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [file] = exactly::<1>(args, "cat <file>")?;
    let path = ctx.resolve(file)?;
    let mut buf = [0u8; MAX_FILE_SIZE];
    let text = ctx
        .fs
        .read_to_str(&path, &mut buf)
        .map_err(|err| ShellError::fs(&path, err))?;
    let _ = ctx.console.write_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        let _ = ctx.console.write_str("\n");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_grouped() {
        assert_eq!(format!("{}", Grouped(0)), "0");
        assert_eq!(format!("{}", Grouped(999)), "999");
        assert_eq!(format!("{}", Grouped(1000)), "1,000");
        assert_eq!(format!("{}", Grouped(1_048_576)), "1,048,576");
        assert_eq!(format!("{}", Grouped(u64::MAX)), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_grouped_pads() {
        assert_eq!(format!("[{:>7}]", Grouped(1234)), "[  1,234]");
        assert_eq!(format!("[{:<7}]", Grouped(12)), "[12     ]");
    }

    #[test]
    fn test_exactly() {
        assert_eq!(exactly::<1>(&["a"], "x"), Ok(["a"]));
        assert_eq!(
            exactly::<2>(&["a"], "cp <src> <dst>"),
            Err(ShellError::InvalidArgumentCount {
                usage: "cp <src> <dst>"
            })
        );
    }
}
