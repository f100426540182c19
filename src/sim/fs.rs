//! A host directory standing in for the board's flash filesystem.

use std::io;
use std::path::{Path as HostPath, PathBuf};

use crate::fs::{DirEntry, Error, FileKind, FileSystem, Metadata, Usage};

/// Block size reported by [`HostFs::usage`].
pub const BLOCK_SIZE: u32 = 4096;

/// Blocks in the simulated volume (about the size of a Pico's littlefs).
pub const TOTAL_BLOCKS: u32 = 352;

/// [`FileSystem`] rooted at a host directory.
///
/// Shell path `/lib/x.txt` maps to `<root>/lib/x.txt`.
#[derive(Debug, Clone)]
pub struct HostFs {
    root: PathBuf,
}

impl HostFs {
    /// Filesystem rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn host(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn map_io(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound,
        io::ErrorKind::AlreadyExists => Error::AlreadyExists,
        io::ErrorKind::NotADirectory => Error::NotADirectory,
        io::ErrorKind::IsADirectory => Error::IsADirectory,
        io::ErrorKind::DirectoryNotEmpty => Error::NotEmpty,
        io::ErrorKind::StorageFull => Error::NoSpace,
        io::ErrorKind::InvalidData => Error::InvalidData,
        _ => Error::Io,
    }
}

fn metadata_of(meta: &std::fs::Metadata) -> Metadata {
    if meta.is_dir() {
        Metadata {
            kind: FileKind::Directory,
            size: 0,
        }
    } else {
        Metadata {
            kind: FileKind::File,
            size: u32::try_from(meta.len()).unwrap_or(u32::MAX),
        }
    }
}

fn bytes_under(dir: &HostPath) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| match entry.metadata() {
            Ok(meta) if meta.is_dir() => bytes_under(&entry.path()),
            Ok(meta) => meta.len().div_ceil(BLOCK_SIZE as u64) * BLOCK_SIZE as u64,
            Err(_) => 0,
        })
        .sum()
}

impl FileSystem for HostFs {
    fn list_dir(&mut self, path: &str, visit: &mut dyn FnMut(DirEntry<'_>)) -> Result<(), Error> {
        let host = self.host(path);
        if !host.is_dir() {
            return Err(if host.exists() {
                Error::NotADirectory
            } else {
                Error::NotFound
            });
        }
        for entry in std::fs::read_dir(host).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let meta = entry.metadata().map_err(map_io)?;
            let name: String = entry.file_name().to_string_lossy().into_owned();
            visit(DirEntry {
                name: &name,
                metadata: metadata_of(&meta),
            });
        }
        Ok(())
    }

    fn metadata(&mut self, path: &str) -> Result<Metadata, Error> {
        let meta = std::fs::metadata(self.host(path)).map_err(map_io)?;
        Ok(metadata_of(&meta))
    }

    fn create_dir(&mut self, path: &str) -> Result<(), Error> {
        std::fs::create_dir(self.host(path)).map_err(map_io)
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), Error> {
        let host = self.host(path);
        if !host.is_dir() {
            return Err(if host.exists() {
                Error::NotADirectory
            } else {
                Error::NotFound
            });
        }
        if std::fs::read_dir(&host).map_err(map_io)?.next().is_some() {
            return Err(Error::NotEmpty);
        }
        std::fs::remove_dir(host).map_err(map_io)
    }

    fn remove_file(&mut self, path: &str) -> Result<(), Error> {
        std::fs::remove_file(self.host(path)).map_err(map_io)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Error> {
        std::fs::rename(self.host(from), self.host(to)).map_err(map_io)
    }

    fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, Error> {
        let host = self.host(path);
        if host.is_dir() {
            return Err(Error::IsADirectory);
        }
        let data = std::fs::read(host).map_err(map_io)?;
        let target = buf.get_mut(..data.len()).ok_or(Error::TooLarge)?;
        target.copy_from_slice(&data);
        Ok(data.len())
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), Error> {
        std::fs::write(self.host(path), data).map_err(map_io)
    }

    fn usage(&mut self) -> Result<Usage, Error> {
        let used_blocks = bytes_under(&self.root) / BLOCK_SIZE as u64;
        let used_blocks = u32::try_from(used_blocks).unwrap_or(u32::MAX);
        Ok(Usage {
            block_size: BLOCK_SIZE,
            total_blocks: TOTAL_BLOCKS,
            free_blocks: TOTAL_BLOCKS.saturating_sub(used_blocks),
        })
    }
}
