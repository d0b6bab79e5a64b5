//! Assembly and program-load error types.
//!
//! This module defines the error conditions the engine's public API can
//! report. There is no runtime error type: division by zero, PC wraparound,
//! and out-of-range memory addresses are all defined behavior (see
//! `core::units::alu` and `core::engine`) and the model cannot fault during
//! `tick()`.

use std::fmt;

/// A single-line assembly error.
///
/// Reported with the 1-based source line number and the offending text so
/// that a caller can point a user at the exact failing line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssemblyError {
    /// The mnemonic on this line is not recognized.
    ///
    /// The associated values are the line number and the unknown mnemonic.
    UnknownMnemonic(usize, String),

    /// An instruction was given the wrong number of operands.
    ///
    /// The associated values are the line number and a description of the
    /// expected operand form.
    WrongArity(usize, String),

    /// An operand that should name a register (`r0`..`r7`) did not.
    ///
    /// The associated values are the line number and the offending token.
    BadRegister(usize, String),

    /// An immediate operand fell outside the representable range (-32..=31).
    ///
    /// The associated values are the line number and the offending token.
    ImmediateOutOfRange(usize, String),

    /// A `lw`/`sw` memory operand was not of the form `imm(rN)`.
    ///
    /// The associated values are the line number and the offending text.
    MalformedMemoryOperand(usize, String),
}

impl AssemblyError {
    /// Returns the 1-based source line number this error occurred on.
    pub fn line(&self) -> usize {
        match self {
            AssemblyError::UnknownMnemonic(line, _)
            | AssemblyError::WrongArity(line, _)
            | AssemblyError::BadRegister(line, _)
            | AssemblyError::ImmediateOutOfRange(line, _)
            | AssemblyError::MalformedMemoryOperand(line, _) => *line,
        }
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::UnknownMnemonic(line, tok) => {
                write!(f, "line {line}: unknown mnemonic '{tok}'")
            }
            AssemblyError::WrongArity(line, expected) => {
                write!(f, "line {line}: wrong operand count, expected {expected}")
            }
            AssemblyError::BadRegister(line, tok) => {
                write!(f, "line {line}: '{tok}' is not a register (expected r0..r7)")
            }
            AssemblyError::ImmediateOutOfRange(line, tok) => {
                write!(f, "line {line}: immediate '{tok}' out of range (-32..=31)")
            }
            AssemblyError::MalformedMemoryOperand(line, tok) => {
                write!(f, "line {line}: malformed memory operand '{tok}', expected imm(rN)")
            }
        }
    }
}

impl std::error::Error for AssemblyError {}

/// A program exceeded the 256-word instruction memory at `load` time.
///
/// Carries the number of words the caller attempted to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramTooLargeError {
    /// Number of words the caller attempted to load.
    pub word_count: usize,
}

impl fmt::Display for ProgramTooLargeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "program has {} words, instruction memory holds only 256",
            self.word_count
        )
    }
}

impl std::error::Error for ProgramTooLargeError {}

/// Top-level error type returned by the engine's public API.
///
/// Wraps the two error conditions the engine can report: a malformed
/// assembly source, or a program too large to fit in instruction memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Assembly failed on one source line; assembly aborts entirely.
    Assembly(AssemblyError),

    /// The assembled program does not fit in the 256-word instruction memory.
    ProgramTooLarge(ProgramTooLargeError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Assembly(e) => write!(f, "{e}"),
            EngineError::ProgramTooLarge(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<AssemblyError> for EngineError {
    fn from(e: AssemblyError) -> Self {
        EngineError::Assembly(e)
    }
}

impl From<ProgramTooLargeError> for EngineError {
    fn from(e: ProgramTooLargeError) -> Self {
        EngineError::ProgramTooLarge(e)
    }
}
