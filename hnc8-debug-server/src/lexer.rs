//! Splits one protocol line into space-delimited tokens.

/// Maximum number of tokens kept from a single line
pub const MAX_TOKENS: usize = 16;

/// Tokens of one input line, borrowed from the line buffer.
///
/// Token 0 is the command name. There is always at least one token; an
/// empty line produces a single empty token.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    tokens: [&'a [u8]; MAX_TOKENS],
    len: usize,
}

impl<'a> Tokens<'a> {
    /// Tokenize a raw line.
    ///
    /// One trailing `\n` (or `\r\n`) is stripped. Runs of spaces count as a
    /// single delimiter. Tokens past MAX_TOKENS are dropped.
    pub fn lex(line: &'a [u8]) -> Self {
        let line = strip_terminator(line);
        let mut tokens = Tokens {
            tokens: [&b""[..]; MAX_TOKENS],
            len: 0,
        };

        for token in line.split(|&b| b == b' ').filter(|t| !t.is_empty()) {
            if tokens.len == MAX_TOKENS {
                break;
            }
            tokens.tokens[tokens.len] = token;
            tokens.len += 1;
        }

        if tokens.len == 0 {
            tokens.len = 1;
        }
        tokens
    }

    /// Command name
    pub fn command(&self) -> &'a [u8] {
        self.tokens[0]
    }

    /// Token at `index`, counting the command as 0
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.as_slice().get(index).copied()
    }

    /// Argument count, including the command itself
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[&'a [u8]] {
        &self.tokens[..self.len]
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    match line {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        _ => line,
    }
}
