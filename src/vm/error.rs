// VM Error types: stack errors, load errors, runtime faults

use std::io;
use thiserror::Error;

/// Stack Errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StackError {
    #[error("Stack underflow")]
    Underflow,
}

/// Errors raised while decoding a program image
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed reading program: {0}")]
    Io(#[from] io::Error),
    #[error("program ends with a partial word at byte offset {offset}")]
    TruncatedWord { offset: usize },
    #[error("program has more than {words} words")]
    ProgramTooLarge { words: usize },
}

/// Invariant violations detected while executing a program.
///
/// Every variant names the address of the instruction (or operand word)
/// where the violation was observed.
#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
pub enum VMFault {
    #[error("invalid value {value} at {address}")]
    InvalidValue { address: usize, value: u16 },
    #[error("bad register ref {value} at {address}")]
    NotARegister { address: usize, value: u16 },
    #[error("invalid op {opcode} at {address}")]
    InvalidOpcode { address: usize, opcode: u16 },
    #[error("pop with empty stack at {address}")]
    StackUnderflow { address: usize },
    #[error("division by zero at {address}")]
    DivisionByZero { address: usize },
    #[error("memory address {address} out of range")]
    AddressOutOfRange { address: usize },
    #[error("output closed while writing at {address}")]
    OutputClosed { address: usize },
}

/// Errors surfaced to the controller of a virtual machine
#[derive(Error, Debug)]
pub enum VmError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("execution failed: {0}")]
    Fault(#[from] VMFault),
    #[error("failed to spawn engine thread: {0}")]
    Spawn(io::Error),
    #[error("engine thread panicked")]
    EnginePanicked,
}
