//! Debug TCP server implementation

use crate::dispatcher::dispatch;
use crate::error::ServerError;
use crate::logger::Logger;
use crate::protocol::{banner, MAX_LINE_LEN, MSG_PROMPT};
use crate::session::SessionContext;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream};

/// Pending connections queued by the kernel while a client is being served
pub const LISTEN_BACKLOG: i32 = 5;

/// Listening address of the debug server
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub addr: SocketAddrV4,
}

impl ServerConfig {
    pub fn new(bind: Ipv4Addr, port: u16) -> Self {
        ServerConfig {
            addr: SocketAddrV4::new(bind, port),
        }
    }
}

/// IPv4 TCP listener with an explicit backlog
fn listen(addr: SocketAddrV4) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    Ok(socket.into())
}

/// Serves one client at a time against a single shared session
pub struct DebugServer {
    listener: TcpListener,
    session: SessionContext,
    logger: Logger,
}

impl DebugServer {
    /// Bind the listening socket and reset the VM
    pub fn bind(
        config: &ServerConfig,
        mut session: SessionContext,
        logger: Logger,
    ) -> Result<Self, ServerError> {
        let listener = listen(config.addr).map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;

        session.vm.reset();

        Ok(DebugServer {
            listener,
            session,
            logger,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    /// Accept and serve clients until shutdown is requested.
    ///
    /// The running flag is only checked between clients. An accept error
    /// ends the loop.
    pub fn run(&mut self) -> Result<(), ServerError> {
        match self.listener.local_addr() {
            Ok(addr) => self
                .logger
                .info(&format!("Debug server listening on {}", addr)),
            Err(_) => self.logger.info("Debug server listening"),
        }

        while self.session.is_running() {
            let (stream, client_addr) = match self.listener.accept() {
                Ok(conn) => conn,
                Err(e) => {
                    self.logger.error(&format!("Error accepting client: {}", e));
                    return Err(ServerError::Accept(e));
                }
            };

            self.logger
                .info(&format!("Client connected from {}", client_addr));
            if let Err(e) = self.handle_client(stream) {
                self.logger.verbose(&format!("Connection error: {}", e));
            }
            self.logger.info("Client disconnected");
        }

        self.logger.info("Shutting down");
        Ok(())
    }

    /// Serve one connection until the client closes it
    fn handle_client(&mut self, stream: TcpStream) -> io::Result<()> {
        let _ = stream.set_nodelay(true);
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = BufWriter::new(stream);
        let mut line = Vec::with_capacity(MAX_LINE_LEN);

        writer.write_all(banner().as_bytes())?;

        loop {
            writer.write_all(MSG_PROMPT.as_bytes())?;
            writer.flush()?;

            line.clear();
            let n = (&mut reader)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }

            self.logger.trace(&format!(
                "Got: {}",
                String::from_utf8_lossy(&line).trim_end_matches(['\r', '\n'])
            ));
            dispatch(&line, &mut self.session, &mut writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Verbosity;
    use hnc8_chip8::{Chip8, FileLoader};
    use std::thread;

    fn start_server() -> (SocketAddr, thread::JoinHandle<Result<(), ServerError>>) {
        let logger = Logger::memory(Verbosity::Trace);
        let session = SessionContext::new(Chip8::default(), Box::new(FileLoader), logger.clone());
        let mut server =
            DebugServer::bind(&ServerConfig::new(Ipv4Addr::LOCALHOST, 0), session, logger).unwrap();
        let addr = server.local_addr().unwrap();
        (addr, thread::spawn(move || server.run()))
    }

    struct Client {
        reader: BufReader<TcpStream>,
        writer: TcpStream,
    }

    impl Client {
        fn connect(addr: SocketAddr) -> Self {
            let stream = TcpStream::connect(addr).unwrap();
            Client {
                reader: BufReader::new(stream.try_clone().unwrap()),
                writer: stream,
            }
        }

        /// Read everything up to the next prompt, prompt excluded
        fn until_prompt(&mut self) -> String {
            let mut buf = Vec::new();
            self.reader.read_until(b'>', &mut buf).unwrap();
            assert_eq!(buf.pop(), Some(b'>'));
            String::from_utf8(buf).unwrap()
        }

        fn send(&mut self, line: &str) -> String {
            self.writer.write_all(line.as_bytes()).unwrap();
            self.until_prompt()
        }
    }

    #[test]
    fn test_session_state_survives_reconnect() {
        let rom = std::env::temp_dir().join(format!("hnc8-server-{}.ch8", std::process::id()));
        std::fs::write(&rom, [0x60u8, 0x0A, 0x12, 0x00]).unwrap();
        let rom_name = rom.to_string_lossy().to_string();

        let (addr, server) = start_server();

        let mut client = Client::connect(addr);
        assert_eq!(client.until_prompt(), banner());
        assert_eq!(
            client.send(&format!("load {}\n", rom_name)),
            format!("Loaded \"{}\".\nOK\n", rom_name)
        );
        assert_eq!(client.send("r v0\n"), "v0\t0x00\t0\nOK\n");
        assert_eq!(client.send("r v0 10\n"), "OK\nSet v0 to 0x000a (10)\n");
        assert_eq!(client.send("frobnicate\n"), "Unknown command \"frobnicate\"\n");
        drop(client);

        let mut client = Client::connect(addr);
        assert_eq!(client.until_prompt(), banner());
        assert_eq!(client.send("r v0\n"), "v0\t0x0a\t10\nOK\n");
        assert_eq!(client.send("si\n"), "OK\n");
        assert_eq!(
            client.send("shutdown\n"),
            "OK\nThe server will shut down after client disconnect.\n"
        );
        // still served until we hang up
        assert_eq!(client.send("r v0\n"), "v0\t0x0a\t10\nOK\n");
        drop(client);

        assert!(server.join().unwrap().is_ok());
        assert!(TcpStream::connect(addr).is_err());
        std::fs::remove_file(rom).unwrap();
    }

    #[test]
    fn test_long_line_is_split() {
        let (addr, server) = start_server();
        let mut client = Client::connect(addr);
        client.until_prompt();

        // 600 bytes without a newline: the first 512 form one line
        let long = "z".repeat(600);
        client.writer.write_all(long.as_bytes()).unwrap();
        client.writer.write_all(b"\n").unwrap();
        let first = client.until_prompt();
        assert_eq!(first, format!("Unknown command \"{}\"\n", "z".repeat(MAX_LINE_LEN)));
        let second = client.until_prompt();
        assert_eq!(second, format!("Unknown command \"{}\"\n", "z".repeat(600 - MAX_LINE_LEN)));

        assert_eq!(
            client.send("shutdown\n"),
            "OK\nThe server will shut down after client disconnect.\n"
        );
        drop(client);
        assert!(server.join().unwrap().is_ok());
    }

    #[test]
    fn test_preloaded_rom() {
        let rom = std::env::temp_dir().join(format!("hnc8-preload-{}.ch8", std::process::id()));
        std::fs::write(&rom, [0x60u8, 0x0A]).unwrap();

        let logger = Logger::memory(Verbosity::Quiet);
        let session = SessionContext::new(Chip8::default(), Box::new(FileLoader), logger.clone());
        let mut server =
            DebugServer::bind(&ServerConfig::new(Ipv4Addr::LOCALHOST, 0), session, logger).unwrap();
        server.session_mut().load_program(&rom).unwrap();
        let addr = server.local_addr().unwrap();
        let handle = thread::spawn(move || server.run());

        let mut client = Client::connect(addr);
        client.until_prompt();
        assert_eq!(client.send("x 0x200 2\n"), "0x0200: 60 0a\nOK\n");
        client.send("shutdown\n");
        drop(client);
        assert!(handle.join().unwrap().is_ok());
        std::fs::remove_file(rom).unwrap();
    }

    #[test]
    fn test_listener_is_ipv4() {
        let logger = Logger::memory(Verbosity::Quiet);
        let session = SessionContext::new(Chip8::default(), Box::new(FileLoader), logger.clone());
        let server =
            DebugServer::bind(&ServerConfig::new(Ipv4Addr::UNSPECIFIED, 0), session, logger)
                .unwrap();
        let addr = server.local_addr().unwrap();
        assert!(addr.is_ipv4());
        assert_eq!(addr.ip(), Ipv4Addr::UNSPECIFIED);
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let logger = Logger::memory(Verbosity::Quiet);
        let session = SessionContext::new(Chip8::default(), Box::new(FileLoader), logger.clone());
        let result = DebugServer::bind(&ServerConfig::new(Ipv4Addr::LOCALHOST, port), session, logger);
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
