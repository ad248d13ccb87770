//! State shared by every client session.
//!
//! There is one context per server process. Sessions are served one after
//! another, so everything here (loaded program, register edits) carries over
//! from one client to the next.

use crate::error::CommandError;
use crate::logger::Logger;
use hnc8_chip8::{Chip8, LoadError, Rom, RomLoader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct SessionContext {
    pub vm: Chip8,
    program: Option<Rom>,
    loader: Box<dyn RomLoader>,
    running: AtomicBool,
    logger: Logger,
}

impl SessionContext {
    pub fn new(vm: Chip8, loader: Box<dyn RomLoader>, logger: Logger) -> Self {
        SessionContext {
            vm,
            program: None,
            loader,
            running: AtomicBool::new(true),
            logger,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// False once a shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop accepting clients after the current one disconnects
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn program(&self) -> Option<&Rom> {
        self.program.as_ref()
    }

    /// The loaded program, or the error every program-bound command reports
    pub fn require_program(&self) -> Result<&Rom, CommandError> {
        self.program.as_ref().ok_or(CommandError::NoFileLoaded)
    }

    /// Replace the loaded program.
    ///
    /// The old image is released before the loader runs, so a failed load
    /// leaves no program behind. On success the VM is reset and the image
    /// mapped at the program start address.
    pub fn load_program(&mut self, path: &Path) -> Result<&Rom, LoadError> {
        if let Some(old) = self.program.take() {
            self.logger
                .verbose(&format!("Unloaded \"{}\" ({} bytes)", old.name(), old.len()));
        }

        let rom = self.loader.load(path)?;
        self.vm.reset();
        self.vm.load_program(rom.data());
        self.logger
            .info(&format!("Loaded \"{}\" ({} bytes)", rom.name(), rom.len()));

        Ok(&*self.program.insert(rom))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::logger::Verbosity;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Loader serving images from memory
    #[derive(Default)]
    pub struct MemLoader {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl MemLoader {
        pub fn with(self, name: &str, data: &[u8]) -> Self {
            self.with_path(PathBuf::from(name), data)
        }

        pub fn with_path(mut self, path: PathBuf, data: &[u8]) -> Self {
            self.files.insert(path, data.to_vec());
            self
        }
    }

    impl RomLoader for MemLoader {
        fn load(&self, path: &Path) -> Result<Rom, LoadError> {
            match self.files.get(path) {
                Some(data) => Ok(Rom::new(path.to_string_lossy(), data.clone())),
                None => Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    pub fn context(loader: MemLoader) -> SessionContext {
        SessionContext::new(Chip8::default(), Box::new(loader), Logger::memory(Verbosity::Trace))
    }
}
