//! Common error types for filesystem operations

use core::fmt;

/// A common error type for filesystem operations.
///
/// Backends map their native errors (littlefs, FAT, `std::io`) onto this set.
/// It is designed to be simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No file or directory at the path.
    NotFound,
    /// Something already exists at the path.
    AlreadyExists,
    /// A path component is not a directory.
    NotADirectory,
    /// The operation needs a file but found a directory.
    IsADirectory,
    /// The directory still has entries.
    NotEmpty,
    /// The medium is full.
    NoSpace,
    /// The file does not fit in the caller's buffer.
    TooLarge,
    /// The file content is not valid UTF-8 where text was expected.
    InvalidData,
    /// The resolved path exceeds [`MAX_PATH_LEN`](super::MAX_PATH_LEN).
    PathTooLong,
    /// Any other failure of the underlying medium.
    Io,
}

impl Error {
    /// Whether the failure comes from the medium rather than from the request.
    pub fn is_medium_fault(&self) -> bool {
        matches!(self, Error::NoSpace | Error::Io)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::NotFound => "no such file or directory",
            Error::AlreadyExists => "already exists",
            Error::NotADirectory => "not a directory",
            Error::IsADirectory => "is a directory",
            Error::NotEmpty => "directory not empty",
            Error::NoSpace => "no space left on device",
            Error::TooLarge => "file too large",
            Error::InvalidData => "not a text file",
            Error::PathTooLong => "path too long",
            Error::Io => "I/O error",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotFound => defmt::write!(f, "NotFound"),
            Error::AlreadyExists => defmt::write!(f, "AlreadyExists"),
            Error::NotADirectory => defmt::write!(f, "NotADirectory"),
            Error::IsADirectory => defmt::write!(f, "IsADirectory"),
            Error::NotEmpty => defmt::write!(f, "NotEmpty"),
            Error::NoSpace => defmt::write!(f, "NoSpace"),
            Error::TooLarge => defmt::write!(f, "TooLarge"),
            Error::InvalidData => defmt::write!(f, "InvalidData"),
            Error::PathTooLong => defmt::write!(f, "PathTooLong"),
            Error::Io => defmt::write!(f, "Io"),
        }
    }
}
