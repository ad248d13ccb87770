use hnc8_debug_server::logger::Verbosity;
use hnc8_debug_server::DEFAULT_PORT;
use std::net::Ipv4Addr;

const HELP: &str = "\
hnc8 - CHIP-8 interpreter debug server

Serves a line based debug protocol over TCP, one client at a time.
Connect with e.g. `nc localhost 4050`.

USAGE:
  hnc8 [OPTIONS]

OPTIONS:
  -h, --help            Prints help information
  -p, --port <port>     TCP port to listen on (default: 4050)
  --bind <ipv4>         Address to bind (default: 0.0.0.0)
  --rom <file>          Load a ROM before accepting clients
  -r, --random-ram      Fill VM memory with random bytes on reset
  -v, --verbose         Log dispatched commands and failures
  -vv, --trace          Log every received line
  --log <file>          Write log output to file instead of stderr
";

#[derive(Debug)]
pub struct AppArgs {
    pub port: u16,
    pub bind: Ipv4Addr,
    pub rom: Option<std::path::PathBuf>,
    pub random_ram: bool,
    pub verbosity: Verbosity,
    pub log_file: Option<String>,
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let verbosity = if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let args = AppArgs {
        port: pargs
            .opt_value_from_str(["-p", "--port"])?
            .unwrap_or(DEFAULT_PORT),
        bind: pargs
            .opt_value_from_str("--bind")?
            .unwrap_or(Ipv4Addr::UNSPECIFIED),
        rom: pargs.opt_value_from_str("--rom")?,
        random_ram: pargs.contains(["-r", "--random-ram"]),
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(args)
}
