//! Command table and name lookup.

/// Every command the server understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Shutdown,
    Load,
    Break,
    Continue,
    Backtrace,
    StepI,
    Examine,
    Commands,
    Registers,
}

/// One entry in the command table
#[derive(Debug)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub short: Option<&'static str>,
    pub command: Command,
    pub help: &'static str,
}

impl CommandDescriptor {
    /// Exact, case-sensitive match on the long name or the short alias
    pub fn matches(&self, token: &[u8]) -> bool {
        self.name.as_bytes() == token || self.short.is_some_and(|s| s.as_bytes() == token)
    }
}

const fn cmd(
    name: &'static str,
    short: Option<&'static str>,
    command: Command,
    help: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        name,
        short,
        command,
        help,
    }
}

pub static COMMANDS: [CommandDescriptor; 10] = [
    //   NAME         SHORT       COMMAND               HELP
    cmd("help", Some("h"), Command::Help, "- Display help message"),
    cmd("shutdown", None, Command::Shutdown, "- Shut down the server"),
    cmd("load", Some("l"), Command::Load, "filename - Load ROM into VM"),
    cmd("break", Some("b"), Command::Break, "[offset] - Add a breakpoint"),
    cmd("continue", Some("c"), Command::Continue, "- Continue execution until breakpoint"),
    cmd("backtrace", Some("bt"), Command::Backtrace, "- Display the stack trace"),
    cmd("stepi", Some("si"), Command::StepI, "[count] - Step forward"),
    cmd("examine", Some("x"), Command::Examine, "address [count] - Examine memory"),
    cmd("commands", None, Command::Commands, "- Display this info about commands"),
    cmd(
        "registers",
        Some("r"),
        Command::Registers,
        "[register] [value] - Display and edit VM registers",
    ),
];

/// Find the descriptor for a command token
pub fn lookup(token: &[u8]) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|d| d.matches(token))
}
