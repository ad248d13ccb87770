use crate::protocol::{MSG_ERR_ARGS_INVALID, MSG_ERR_ARGS_MISSING, MSG_ERR_NO_FILE};
use hnc8_chip8::LoadError;
use std::net::SocketAddrV4;

/// Failure of a single command handler
#[derive(Debug)]
pub enum CommandError {
    /// Required argument not given
    MissingArguments,
    /// Argument not understood (e.g. unknown register letter)
    InvalidArguments,
    /// Command needs a loaded program
    NoFileLoaded,
    /// Loader rejected the file
    LoadFailed { name: String, source: LoadError },
    /// Register value did not parse
    InvalidValue,
    /// `v` register index outside 0..=15
    InvalidRegisterIndex,
    /// Unknown `s…` register
    InvalidRegisterName,
    /// Address or count did not parse; the client only sees the generic error
    InvalidNumber,
    /// Address past the end of VM memory
    AddressOutOfRange(i64),
    /// Writing the reply failed
    Io(std::io::Error),
}

impl CommandError {
    /// Specific diagnostic line shown to the client, if any
    pub fn client_message(&self) -> Option<String> {
        match self {
            CommandError::InvalidNumber | CommandError::Io(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::MissingArguments => write!(f, "{}", MSG_ERR_ARGS_MISSING),
            CommandError::InvalidArguments => write!(f, "{}", MSG_ERR_ARGS_INVALID),
            CommandError::NoFileLoaded => write!(f, "{}", MSG_ERR_NO_FILE),
            CommandError::LoadFailed { name, .. } => write!(f, "Could not load file \"{}\"", name),
            CommandError::InvalidValue => write!(f, "Invalid value"),
            CommandError::InvalidRegisterIndex => write!(f, "Invalid v register index"),
            CommandError::InvalidRegisterName => write!(f, "Invalid register name"),
            CommandError::InvalidNumber => write!(f, "Invalid number"),
            CommandError::AddressOutOfRange(addr) => {
                write!(f, "Address out of range: 0x{:04x}", addr)
            }
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::LoadFailed { source, .. } => Some(source),
            CommandError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Io(e)
    }
}

/// Fatal server errors
#[derive(Debug)]
pub enum ServerError {
    /// Could not bind the listening socket
    Bind {
        addr: SocketAddrV4,
        source: std::io::Error,
    },
    /// accept() failed
    Accept(std::io::Error),
    /// ROM given on the command line could not be loaded
    Preload(LoadError),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Bind { addr, source } => write!(f, "Error binding to {}: {}", addr, source),
            ServerError::Accept(e) => write!(f, "Error accepting client: {}", e),
            ServerError::Preload(e) => write!(f, "Could not load ROM {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Accept(e) => Some(e),
            ServerError::Preload(e) => Some(e),
        }
    }
}
