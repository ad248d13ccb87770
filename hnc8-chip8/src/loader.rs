//! ROM loading.

use crate::MAX_PROGRAM_SIZE;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    /// File could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File contains no bytes
    Empty(PathBuf),
    /// File does not fit in program memory
    TooLarge { path: PathBuf, size: usize },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            LoadError::Empty(path) => write!(f, "{}: empty file", path.display()),
            LoadError::TooLarge { path, size } => write!(
                f,
                "{}: {} bytes exceeds the {} byte program area",
                path.display(),
                size,
                MAX_PROGRAM_SIZE
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A loaded program image. Dropping it releases the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    name: String,
    data: Vec<u8>,
}

impl Rom {
    pub fn new<S: Into<String>>(name: S, data: Vec<u8>) -> Self {
        Rom {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Source of program images
pub trait RomLoader: Send {
    fn load(&self, path: &Path) -> Result<Rom, LoadError>;
}

/// Loads raw ROM images from the host filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl RomLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Rom, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }
        if data.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                size: data.len(),
            });
        }

        Ok(Rom::new(path.to_string_lossy(), data))
    }
}
