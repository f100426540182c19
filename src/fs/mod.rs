//! # Filesystem interface used by the shell
//!
//! The shell does not implement a filesystem. It talks to whatever the board
//! provides (littlefs on flash, a FAT SD card, a host directory in the
//! simulator) through the [`FileSystem`] trait.
//!
//! All paths handed to a [`FileSystem`] are absolute and normalized; the
//! shell resolves user input against its current directory with
//! [`path::resolve`] first. Whole-file reads go into a caller buffer, so
//! nothing here allocates.
//!
//! ```rust,no_run
//! use angusto::fs::{FileSystem, Error};
//!
//! fn show<F: FileSystem>(fs: &mut F) -> Result<(), Error> {
//!     let mut buf = [0u8; 512];
//!     let text = fs.read_to_str("/config.json", &mut buf)?;
//!     let _ = text;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

use core::str;

/// Filesystem error types
pub mod error;

/// Path resolution helpers
pub mod path;

pub use error::Error;
pub use path::{MAX_PATH_LEN, Path};

/// Type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

/// Result of a `stat` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Metadata {
    /// File or directory.
    pub kind: FileKind,
    /// Size in bytes (0 for directories).
    pub size: u32,
}

impl Metadata {
    /// Whether this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// One entry produced by [`FileSystem::list_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Entry name, without the directory part.
    pub name: &'a str,
    /// Type and size.
    pub metadata: Metadata,
}

/// Block usage of the mounted volume, as reported by `statvfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Usage {
    /// Bytes per block.
    pub block_size: u32,
    /// Blocks on the volume.
    pub total_blocks: u32,
    /// Blocks not in use.
    pub free_blocks: u32,
}

impl Usage {
    /// Capacity in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.block_size as u64 * self.total_blocks as u64
    }

    /// Bytes in use.
    pub fn used_bytes(&self) -> u64 {
        self.block_size as u64 * self.total_blocks.saturating_sub(self.free_blocks) as u64
    }

    /// Bytes available.
    pub fn free_bytes(&self) -> u64 {
        self.block_size as u64 * self.free_blocks as u64
    }
}

/// Operations the shell needs from the board's filesystem.
pub trait FileSystem {
    /// Call `visit` once per entry of the directory at `path`.
    fn list_dir(&mut self, path: &str, visit: &mut dyn FnMut(DirEntry<'_>)) -> Result<(), Error>;

    /// Type and size of the entry at `path`.
    fn metadata(&mut self, path: &str) -> Result<Metadata, Error>;

    /// Create a directory.
    fn create_dir(&mut self, path: &str) -> Result<(), Error>;

    /// Remove an empty directory.
    fn remove_dir(&mut self, path: &str) -> Result<(), Error>;

    /// Remove a file.
    fn remove_file(&mut self, path: &str) -> Result<(), Error>;

    /// Move or rename a file.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), Error>;

    /// Read the whole file into `buf`, returning the byte count.
    ///
    /// Fails with [`Error::TooLarge`] if the file does not fit.
    fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, Error>;

    /// Create or truncate the file and write `data` to it.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), Error>;

    /// Block usage of the volume.
    fn usage(&mut self) -> Result<Usage, Error>;

    /// Whether anything exists at `path`.
    fn exists(&mut self, path: &str) -> bool {
        self.metadata(path).is_ok()
    }

    /// Read the whole file as UTF-8 text.
    fn read_to_str<'b>(&mut self, path: &str, buf: &'b mut [u8]) -> Result<&'b str, Error> {
        let len = self.read(path, buf)?;
        str::from_utf8(&buf[..len]).map_err(|_| Error::InvalidData)
    }

    /// Create or truncate the file and write `text` to it.
    fn write_str(&mut self, path: &str, text: &str) -> Result<(), Error> {
        self.write(path, text.as_bytes())
    }
}
