//! Wire constants for the line-oriented debug protocol.
//!
//! Every client line is at most MAX_LINE_LEN bytes including the `\n`.
//! The server writes the banner on connect and the prompt before each read.

/// Maximum client line length, terminator included
pub const MAX_LINE_LEN: usize = 512;

pub const MSG_PROMPT: &str = ">";
pub const MSG_OK: &str = "OK\n";
pub const MSG_SHUTDOWN: &str = "The server will shut down after client disconnect.\n";
pub const MSG_HELP: &str = "\
hnc8 debug server

Each line is a command followed by space separated arguments.
Numbers accept C style prefixes: 0x for hex, a leading 0 for octal.

  load <file>           load a ROM image at 0x200 and reset the VM
  registers             show all registers
  registers <reg>       show one register (v0-v15, i, pc, sp, dt, st)
  registers <reg> <n>   set a register
  examine <addr> [n]    dump n bytes of memory (default 16)
  shutdown              stop the server once this client disconnects

Type \"commands\" for the full list with short aliases.
";

pub const MSG_ERR_FN: &str = "Error executing function\n";
pub const MSG_ERR_NO_FILE: &str =
    "No file has been loaded.\nUse command \"load filename\" to load a program.";
pub const MSG_ERR_ARGS_INVALID: &str = "Invalid arguments for function";
pub const MSG_ERR_ARGS_MISSING: &str = "Too few arguments to call function";

/// Greeting sent when a client connects
pub fn banner() -> String {
    format!(
        "hnc8 debug server {}\nType \"help\" for help or \"commands\" for a listing of commands.\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Parse an integer the way C's `strtol(s, _, 0)` picks a radix:
/// `0x`/`0X` is hex, a leading `0` is octal, anything else decimal.
/// An optional sign is accepted. The whole token must be consumed.
pub fn parse_int(token: &[u8]) -> Option<i64> {
    let s = std::str::from_utf8(token).ok()?;
    let (negative, digits) = match s.as_bytes().first().copied()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would accept a second sign here
    if digits.is_empty() || !digits.bytes().all(|b| (b as char).is_digit(radix)) {
        return None;
    }

    let value = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_int(b"255"), Some(255));
        assert_eq!(parse_int(b"0"), Some(0));
        assert_eq!(parse_int(b"-3"), Some(-3));
    }

    #[test]
    fn test_parse_radix_prefixes() {
        assert_eq!(parse_int(b"0x200"), Some(0x200));
        assert_eq!(parse_int(b"0XfF"), Some(0xff));
        assert_eq!(parse_int(b"017"), Some(0o17));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"0x"), None);
        assert_eq!(parse_int(b"12abc"), None);
        assert_eq!(parse_int(b"09"), None);
        assert_eq!(parse_int(b"--1"), None);
        assert_eq!(parse_int(b"0x+1"), None);
        assert_eq!(parse_int(&[0xff, 0xfe]), None);
    }

    #[test]
    fn test_banner() {
        let banner = banner();
        assert!(banner.starts_with("hnc8 debug server "));
        assert!(banner.ends_with("for a listing of commands.\n"));
    }
}
