use thiserror::Error;

/// Rejected registry mutations and encode requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsaError {
    #[error("opcode 0x{opcode:X} already used by {existing}, cannot assign it to {mnemonic}")]
    OpcodeConflict {
        opcode: u16,
        existing: String,
        mnemonic: String,
    },

    #[error("unknown instruction: {0}")]
    UnknownMnemonic(String),

    #[error("{mnemonic} expects at least {expected} operands, got {got}")]
    MalformedOperands {
        mnemonic: String,
        expected: usize,
        got: usize,
    },
}

/// Failures while reading or writing an ISA document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot access ISA document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ISA document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Isa(#[from] IsaError),
}
