//! Command handlers.
//!
//! Each handler writes its success reply to `out` and returns `Err` for
//! failures; the dispatcher turns the error into the client diagnostic.

use crate::commands::{Command, COMMANDS};
use crate::error::CommandError;
use crate::lexer::Tokens;
use crate::protocol::{parse_int, MSG_HELP, MSG_OK, MSG_SHUTDOWN};
use crate::registers::{parse_value, Register};
use crate::session::SessionContext;
use hnc8_chip8::MEMORY_SIZE;
use std::io::Write;
use std::path::PathBuf;

type HandlerResult = Result<(), CommandError>;

/// Bytes dumped by `examine` when no count is given
pub const DEFAULT_EXAMINE_COUNT: usize = 16;

const EXAMINE_ROW: usize = 16;

/// Run one command. `args` holds the full token list, command included.
pub fn execute<W: Write>(
    command: Command,
    ctx: &mut SessionContext,
    args: &Tokens,
    out: &mut W,
) -> HandlerResult {
    match command {
        Command::Help => cmd_help(out),
        Command::Commands => cmd_commands(out),
        Command::Shutdown => cmd_shutdown(ctx, out),
        Command::Load => cmd_load(ctx, args, out),
        Command::Break => cmd_break(ctx, args, out),
        Command::Continue => cmd_continue(ctx, out),
        Command::Backtrace => cmd_backtrace(ctx, out),
        Command::StepI => cmd_stepi(ctx, args, out),
        Command::Examine => cmd_examine(ctx, args, out),
        Command::Registers => cmd_registers(ctx, args, out),
    }
}

fn cmd_help<W: Write>(out: &mut W) -> HandlerResult {
    out.write_all(MSG_HELP.as_bytes())?;
    Ok(())
}

fn cmd_commands<W: Write>(out: &mut W) -> HandlerResult {
    writeln!(out, "Available commands:")?;
    for d in COMMANDS.iter() {
        writeln!(out, "  {} {}", d.name, d.help)?;
    }
    Ok(())
}

fn cmd_shutdown<W: Write>(ctx: &mut SessionContext, out: &mut W) -> HandlerResult {
    out.write_all(MSG_OK.as_bytes())?;
    out.write_all(MSG_SHUTDOWN.as_bytes())?;
    ctx.request_shutdown();
    ctx.logger().info("Shutdown requested");
    Ok(())
}

fn cmd_load<W: Write>(ctx: &mut SessionContext, args: &Tokens, out: &mut W) -> HandlerResult {
    let token = args.get(1).ok_or(CommandError::MissingArguments)?;
    let name = String::from_utf8_lossy(token).into_owned();

    match ctx.load_program(&token_path(token)) {
        Ok(_) => {
            writeln!(out, "Loaded \"{}\".", name)?;
            out.write_all(MSG_OK.as_bytes())?;
            Ok(())
        }
        Err(source) => {
            ctx.logger().error(&format!("Load failed: {}", source));
            Err(CommandError::LoadFailed { name, source })
        }
    }
}

/// Filesystem path named by a raw token, without lossy conversion on unix
#[cfg(unix)]
fn token_path(token: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(token))
}

#[cfg(not(unix))]
fn token_path(token: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(token).into_owned())
}

// break, continue, backtrace and stepi only check that a program is present
// and acknowledge; the VM has no execution control wired to them yet.

fn cmd_break<W: Write>(ctx: &mut SessionContext, args: &Tokens, out: &mut W) -> HandlerResult {
    ctx.require_program()?;
    if let Some(offset) = args.get(1) {
        ctx.logger()
            .verbose(&format!("break {}", String::from_utf8_lossy(offset)));
    }
    out.write_all(MSG_OK.as_bytes())?;
    Ok(())
}

fn cmd_continue<W: Write>(ctx: &mut SessionContext, out: &mut W) -> HandlerResult {
    ctx.require_program()?;
    out.write_all(MSG_OK.as_bytes())?;
    Ok(())
}

fn cmd_backtrace<W: Write>(ctx: &mut SessionContext, out: &mut W) -> HandlerResult {
    ctx.require_program()?;
    out.write_all(MSG_OK.as_bytes())?;
    Ok(())
}

fn cmd_stepi<W: Write>(ctx: &mut SessionContext, args: &Tokens, out: &mut W) -> HandlerResult {
    ctx.require_program()?;
    if let Some(count) = args.get(1) {
        ctx.logger()
            .verbose(&format!("stepi {}", String::from_utf8_lossy(count)));
    }
    out.write_all(MSG_OK.as_bytes())?;
    Ok(())
}

fn cmd_examine<W: Write>(ctx: &mut SessionContext, args: &Tokens, out: &mut W) -> HandlerResult {
    ctx.require_program()?;
    let addr = args.get(1).ok_or(CommandError::MissingArguments)?;
    let addr = parse_int(addr).ok_or(CommandError::InvalidNumber)?;
    let count = match args.get(2) {
        Some(count) => match parse_int(count) {
            Some(n) if n >= 0 => n as usize,
            _ => return Err(CommandError::InvalidNumber),
        },
        None => DEFAULT_EXAMINE_COUNT,
    };

    if addr < 0 {
        return Err(CommandError::InvalidNumber);
    }
    if addr >= MEMORY_SIZE as i64 {
        return Err(CommandError::AddressOutOfRange(addr));
    }

    let start = addr as usize;
    let end = start.saturating_add(count).min(MEMORY_SIZE);
    let memory = &ctx.vm.memory()[start..end];
    for (row, bytes) in memory.chunks(EXAMINE_ROW).enumerate() {
        write!(out, "0x{:04x}:", start + row * EXAMINE_ROW)?;
        for b in bytes {
            write!(out, " {:02x}", b)?;
        }
        writeln!(out)?;
    }

    out.write_all(MSG_OK.as_bytes())?;
    Ok(())
}

fn cmd_registers<W: Write>(ctx: &mut SessionContext, args: &Tokens, out: &mut W) -> HandlerResult {
    let Some(name) = args.get(1) else {
        for reg in Register::all() {
            out.write_all(reg.format(&ctx.vm).as_bytes())?;
        }
        return Ok(());
    };

    // Only `registers <name> <value>` writes; any other argument count reads.
    // The value is checked before the name so a bad value never touches the VM.
    let value = match args.len() {
        3 => args.get(2).map(parse_value).transpose()?,
        _ => None,
    };
    let reg = Register::parse(name)?;

    match value {
        Some(value) => {
            let stored = reg.write(&mut ctx.vm, value);
            ctx.logger()
                .verbose(&format!("Set {} to 0x{:04x}", reg.name(), stored));
            out.write_all(MSG_OK.as_bytes())?;
            writeln!(out, "Set {} to 0x{:04x} ({})", reg.name(), stored, stored)?;
        }
        None => {
            out.write_all(reg.format(&ctx.vm).as_bytes())?;
            out.write_all(MSG_OK.as_bytes())?;
        }
    }
    Ok(())
}
