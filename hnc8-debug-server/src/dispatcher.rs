use crate::commands::lookup;
use crate::error::CommandError;
use crate::handlers;
use crate::lexer::Tokens;
use crate::protocol::MSG_ERR_FN;
use crate::session::SessionContext;
use std::io::{self, Write};

/// Handle one protocol line: lex it, find the command, run it once and
/// write the reply. Only I/O errors on `out` are returned.
pub fn dispatch<W: Write>(line: &[u8], ctx: &mut SessionContext, out: &mut W) -> io::Result<()> {
    let tokens = Tokens::lex(line);
    ctx.logger().trace(&format!(
        "Tokens: {:?}",
        tokens
            .as_slice()
            .iter()
            .map(|t| String::from_utf8_lossy(t))
            .collect::<Vec<_>>()
    ));

    let Some(descriptor) = lookup(tokens.command()) else {
        writeln!(
            out,
            "Unknown command \"{}\"",
            String::from_utf8_lossy(tokens.command())
        )?;
        return Ok(());
    };

    ctx.logger().verbose(&format!("Command: {}", descriptor.name));
    match handlers::execute(descriptor.command, ctx, &tokens, out) {
        Ok(()) => Ok(()),
        Err(CommandError::Io(e)) => Err(e),
        Err(e) => {
            ctx.logger()
                .verbose(&format!("Command {} failed: {}", descriptor.name, e));
            if let Some(msg) = e.client_message() {
                writeln!(out, "{}", msg)?;
            }
            out.write_all(MSG_ERR_FN.as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{context, MemLoader};

    fn reply(ctx: &mut SessionContext, line: &str) -> String {
        let mut out = Vec::new();
        dispatch(line.as_bytes(), ctx, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_unknown_command() {
        let mut ctx = context(MemLoader::default());
        assert_eq!(reply(&mut ctx, "frobnicate\n"), "Unknown command \"frobnicate\"\n");
        assert_eq!(reply(&mut ctx, "R v0\n"), "Unknown command \"R\"\n");
        assert!(ctx.is_running());
        assert!(ctx.program().is_none());
    }

    #[test]
    fn test_empty_line() {
        let mut ctx = context(MemLoader::default());
        assert_eq!(reply(&mut ctx, "\n"), "Unknown command \"\"\n");
        assert_eq!(reply(&mut ctx, ""), "Unknown command \"\"\n");
    }

    #[test]
    fn test_alias_routes_to_same_handler() {
        let mut ctx = context(MemLoader::default());
        assert_eq!(reply(&mut ctx, "r\n"), reply(&mut ctx, "registers\n"));
    }

    #[test]
    fn test_failure_messages() {
        let mut ctx = context(MemLoader::default());
        assert_eq!(
            reply(&mut ctx, "load\n"),
            "Too few arguments to call function\nError executing function\n"
        );
        assert_eq!(
            reply(&mut ctx, "bt\n"),
            "No file has been loaded.\nUse command \"load filename\" to load a program.\nError executing function\n"
        );
        assert_eq!(
            reply(&mut ctx, "r v16 1\n"),
            "Invalid v register index\nError executing function\n"
        );
        assert_eq!(
            reply(&mut ctx, "load nonexistent.rom\n"),
            "Could not load file \"nonexistent.rom\"\nError executing function\n"
        );
    }

    #[test]
    fn test_unparsable_address_gets_generic_error_only() {
        let mut ctx = context(MemLoader::default().with("a.ch8", &[0x00]));
        reply(&mut ctx, "load a.ch8\n");
        assert_eq!(reply(&mut ctx, "x nope\n"), "Error executing function\n");
    }

    #[test]
    fn test_logs_tokens() {
        let mut ctx = context(MemLoader::default());
        reply(&mut ctx, "r  v1\n");
        let lines = ctx.logger().lines();
        assert!(lines.contains(&"Tokens: [\"r\", \"v1\"]".to_string()));
        assert!(lines.contains(&"Command: registers".to_string()));
    }
}
