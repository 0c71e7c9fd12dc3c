use std::error::Error;
use std::fmt;

/// Fatal schema problems. These can only happen at startup, while the
/// address catalog is resolved against the symbol table; after a successful
/// init every later read may assume resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The symbol table has no entry with this name.
    MissingSymbol(String),
    /// The symbol table has several entries with this name and the caller
    /// did not disambiguate (`addr_near` / `addr_or`).
    AmbiguousSymbol { name: String, candidates: usize },
    /// A line of the symbol listing could not be parsed.
    MalformedListing { line_no: usize, line: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSymbol(name) => write!(f, "missing symbol `{name}`"),
            Self::AmbiguousSymbol { name, candidates } => {
                write!(f, "symbol `{name}` is ambiguous ({candidates} candidates)")
            }
            Self::MalformedListing { line_no, line } => {
                write!(f, "malformed symbol listing at line {line_no}: {line:?}")
            }
        }
    }
}

impl Error for SchemaError {}

/// Per-call failures of the emulator channel.
///
/// A *short* read is not an error: `read_range` returns the bytes that were
/// available and the caller validates lengths. `BridgeError` is reserved for
/// calls that could not be serviced at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The IPC channel to the emulator is closed.
    BridgeUnavailable,
    /// A typed read got fewer bytes than the value needs.
    ShortRead { addr: u32, wanted: usize, got: usize },
    /// The emulator rejected a control/press/hold command.
    CommandRejected(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BridgeUnavailable => write!(f, "emulator bridge unavailable"),
            Self::ShortRead { addr, wanted, got } => {
                write!(f, "short read at {addr:#010X}: wanted {wanted} bytes, got {got}")
            }
            Self::CommandRejected(msg) => write!(f, "command rejected: {msg}"),
        }
    }
}

impl Error for BridgeError {}
