mod commands;
mod dispatcher;
mod error;
mod handlers;
mod lexer;
pub mod logger;
mod protocol;
mod registers;
mod server;
mod session;

use std::path::Path;

pub use commands::{lookup, Command, CommandDescriptor, COMMANDS};
pub use dispatcher::dispatch;
pub use error::{CommandError, ServerError};
pub use lexer::{Tokens, MAX_TOKENS};
pub use protocol::MAX_LINE_LEN;
pub use server::{DebugServer, ServerConfig, LISTEN_BACKLOG};
pub use session::SessionContext;

/// Default port for debugger connections
pub const DEFAULT_PORT: u16 = 4050;

/// Start the debug server and block until it shuts down.
///
/// `rom` is loaded after the VM reset, before the first client is accepted.
pub fn start(
    config: &ServerConfig,
    session: SessionContext,
    rom: Option<&Path>,
    logger: logger::Logger,
) -> Result<(), ServerError> {
    let mut server = DebugServer::bind(config, session, logger)?;
    if let Some(path) = rom {
        server
            .session_mut()
            .load_program(path)
            .map_err(ServerError::Preload)?;
    }
    server.run()
}
