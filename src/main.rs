mod parse_args;

use hnc8_chip8::{Chip8, FileLoader, MemoryInit};
use hnc8_debug_server::logger::Logger;
use hnc8_debug_server::{ServerConfig, SessionContext};
use parse_args::parse_args;

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Set up logger
    let logger = match &args.log_file {
        Some(path) => match Logger::file(path, args.verbosity) {
            Ok(l) => {
                eprintln!("Logging to: {}", path);
                l
            }
            Err(e) => {
                eprintln!("Failed to open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Logger::stderr(args.verbosity),
    };

    let vm = Chip8::new(if args.random_ram {
        MemoryInit::Random
    } else {
        MemoryInit::Zero
    });
    let session = SessionContext::new(vm, Box::new(FileLoader), logger.clone());
    let config = ServerConfig::new(args.bind, args.port);

    if let Err(e) = hnc8_debug_server::start(&config, session, args.rom.as_deref(), logger.clone()) {
        logger.error(&e.to_string());
        std::process::exit(1);
    }
}
