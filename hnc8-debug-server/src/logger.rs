//! Simple logger that can write to stderr or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex};

/// Verbosity level for debug output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Connection events and errors only
    #[default]
    Quiet = 0,
    /// Dispatched commands and handler failures
    Verbose = 1,
    /// Every received line and its tokens
    Trace = 2,
}

/// Output destination for logger
enum Output {
    Stderr,
    File(BufWriter<File>),
    #[cfg(test)]
    Memory(Vec<String>),
}

/// Thread-safe logger
pub struct Logger {
    output: Arc<Mutex<Output>>,
    verbosity: Verbosity,
}

impl Logger {
    /// Create a new logger writing to stderr
    pub fn stderr(verbosity: Verbosity) -> Self {
        Logger {
            output: Arc::new(Mutex::new(Output::Stderr)),
            verbosity,
        }
    }

    /// Create a new logger writing to a file
    pub fn file(path: &str, verbosity: Verbosity) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Logger {
            output: Arc::new(Mutex::new(Output::File(BufWriter::new(file)))),
            verbosity,
        })
    }

    #[cfg(test)]
    pub(crate) fn memory(verbosity: Verbosity) -> Self {
        Logger {
            output: Arc::new(Mutex::new(Output::Memory(Vec::new()))),
            verbosity,
        }
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> Vec<String> {
        match self.output.lock().as_deref() {
            Ok(Output::Memory(lines)) => lines.clone(),
            _ => vec![],
        }
    }

    /// Log a message if verbosity level is met
    pub fn log(&self, level: Verbosity, msg: &str) {
        if self.verbosity >= level {
            self.write_line(msg);
        }
    }

    /// Log at Verbose level
    pub fn verbose(&self, msg: &str) {
        self.log(Verbosity::Verbose, msg);
    }

    /// Log at Trace level
    pub fn trace(&self, msg: &str) {
        self.log(Verbosity::Trace, msg);
    }

    /// Always log
    pub fn info(&self, msg: &str) {
        self.write_line(msg);
    }

    /// Always log, marked as an error
    pub fn error(&self, msg: &str) {
        self.write_line(&format!("ERROR: {}", msg));
    }

    fn write_line(&self, msg: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        if let Ok(mut output) = self.output.lock() {
            match &mut *output {
                Output::Stderr => {
                    eprintln!("[{}] {}", stamp, msg);
                }
                Output::File(f) => {
                    let _ = writeln!(f, "[{}] {}", stamp, msg);
                    let _ = f.flush();
                }
                #[cfg(test)]
                Output::Memory(lines) => lines.push(msg.to_string()),
            }
        }
    }
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        Logger {
            output: self.output.clone(),
            verbosity: self.verbosity,
        }
    }
}
